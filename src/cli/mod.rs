pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "project2")]
#[command(about = "project2 CLI - operational tasks for the portfolio API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Insert the sample projects")]
    Seed {
        #[arg(long, help = "Delete every existing project first")]
        reset: bool,
    },

    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Print a bearer token for an existing user")]
    Token {
        #[arg(help = "Email of the user")]
        email: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Seed { reset } => commands::seed::handle(config, reset, output_format).await,
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::Token { email } => commands::token::handle(config, &email, output_format).await,
    }
}

/// Every CLI command talks to Postgres directly
pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<DatabaseManager> {
    DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database (is DATABASE_URL set?)")
}
