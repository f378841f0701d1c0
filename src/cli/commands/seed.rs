use serde_json::json;

use crate::cli::{connect, utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::models::NewProject;
use crate::database::{PgStorage, ProjectStore};

const SAMPLE_PROJECTS: [(&str, &str); 4] = [
    (
        "Ultimate to-do app",
        "Ultimate to-do app is an application to help people keep track of the tasks they have yet to finish",
    ),
    (
        "Restaurant madness game",
        "Restaurant madness game is the game I did as the first project for Ironhack. It's a game where you have to organize different tables and make sure customers end up happy.",
    ),
    (
        "Chill pill",
        "Chill pill is an online CBD store that we did as the project for the second module of Ironhack",
    ),
    (
        "Lego Buddies",
        "Lego Stars is an app designed to help Lego users organize their pieces and keep track of their collection, a very useful tool for those with the house full of legos",
    ),
];

pub fn sample_projects() -> Vec<NewProject> {
    SAMPLE_PROJECTS
        .iter()
        .map(|(title, description)| NewProject {
            title: title.to_string(),
            description: description.to_string(),
            image_url: None,
        })
        .collect()
}

/// Inserts the samples, optionally wiping the collection first. Returns (removed, inserted).
pub async fn seed<S: ProjectStore + ?Sized>(store: &S, reset: bool) -> anyhow::Result<(u64, usize)> {
    let removed = if reset { store.delete_all_projects().await? } else { 0 };

    let mut inserted = 0;
    for project in sample_projects() {
        let title = project.title.clone();
        match store.create_project(project).await? {
            Some(_) => inserted += 1,
            None => tracing::warn!("Store returned nothing for sample project '{}'", title),
        }
    }
    Ok((removed, inserted))
}

pub async fn handle(config: &AppConfig, reset: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let manager = connect(config).await?;
    let store = PgStorage::new(manager.pool());

    let result = seed(&store, reset).await;
    manager.close().await;
    let (removed, inserted) = result?;

    output_success(
        &output_format,
        &format!("Seed done, {} projects inserted", inserted),
        Some(json!({ "inserted": inserted, "removed": removed })),
    )
}
