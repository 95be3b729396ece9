use async_trait::async_trait;
use std::sync::Arc;

use super::role_error::{parse_id, RoleError};
use crate::database::models::{ResourceType, RoleName};
use crate::database::Store;

/// Revokes one of a user's roles by role id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRemover: Send + Sync {
    async fn call(&self, user_id: &str, role_id: &str) -> anyhow::Result<()>;
}

pub struct RemoveRoleService {
    store: Arc<dyn Store>,
}

impl RemoveRoleService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn remove_role(&self, user_id: &str, role_id: &str) -> Result<(), RoleError> {
        let user_id = parse_id("user_id", user_id)?;
        let role_id = parse_id("role_id", role_id)?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(RoleError::UserNotFound(user_id))?;

        let held = self.store.roles_for_user(user.id).await?;
        let Some(role) = held.into_iter().find(|r| r.id == role_id) else {
            return Err(RoleError::MissingRole(user.display_name().to_string()));
        };

        if role.role_name() == Some(RoleName::OrgUser) {
            // Dropping membership also drops admin rights on the same organization
            let scope = role
                .resource_type
                .as_deref()
                .and_then(ResourceType::parse)
                .zip(role.resource_id);
            if let Some(admin_role) = self.store.find_role_by(RoleName::OrgAdmin, scope).await? {
                self.store.unlink_role(user.id, admin_role.id).await?;
            }
        }

        self.store.unlink_role(user.id, role.id).await?;
        tracing::info!("Removed role {} ({}) from user {}", role.id, role.name, user.id);
        Ok(())
    }
}

#[async_trait]
impl RoleRemover for RemoveRoleService {
    async fn call(&self, user_id: &str, role_id: &str) -> anyhow::Result<()> {
        Ok(self.remove_role(user_id, role_id).await?)
    }
}
