use anyhow::Context;

use crate::cli::{connect, utils::output_success, OutputFormat};
use crate::config::AppConfig;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let manager = connect(config).await?;
    manager.migrate().await.context("migration failed")?;
    manager.close().await;

    output_success(&output_format, "Migrations applied", None)
}
