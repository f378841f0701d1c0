use anyhow::anyhow;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::{connect, utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{PgStorage, UserStore};

pub async fn handle(config: &AppConfig, email: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let manager = connect(config).await?;
    let store = PgStorage::new(manager.pool());

    let user = store.find_user_by_email(email).await;
    manager.close().await;
    let user = user?.ok_or_else(|| anyhow!("No user registered with email '{}'", email))?;

    let claims = Claims::new(&user, config.security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &config.security)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token generated",
            Some(json!({ "authToken": token, "expiresAt": claims.exp })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
