use crate::auth::session_token;
use crate::cli::{utils::output_value, OutputFormat};
use crate::config::config;
use crate::database::DatabaseManager;

/// Mint a session token for an existing user, for sign-in or API use.
pub async fn handle(user_id: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config();
    let id: i64 = user_id
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid user id '{}'", user_id))?;

    let store = DatabaseManager::open(&config.database).await?;
    let user = store
        .find_user(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Couldn't find User with id {}", id))?;

    let token = session_token(user.id, &user.email, &config.security)?;
    output_value(&output_format, "token", &token)
}
