use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::database::models::RoleName;
use crate::database::DatabaseManager;
use crate::services::AddRoleService;

pub async fn handle(user_id: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = DatabaseManager::open(&config().database).await?;
    AddRoleService::new(store)
        .add_role(user_id, RoleName::SuperAdmin.as_str(), "")
        .await?;

    output_success(
        &output_format,
        &format!("User {} is now a super admin", user_id),
        Some(json!({ "user_id": user_id, "role": RoleName::SuperAdmin.as_str() })),
    )
}
