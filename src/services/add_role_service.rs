use async_trait::async_trait;
use std::sync::Arc;

use super::role_error::{parse_id, RoleError};
use crate::database::models::{ResourceType, RoleName, User};
use crate::database::Store;

/// Grants a role to a user.
///
/// Arguments are the raw request parameters; implementations parse them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleAssigner: Send + Sync {
    async fn call(&self, user_id: &str, resource_type: &str, resource_id: &str) -> anyhow::Result<()>;
}

pub struct AddRoleService {
    store: Arc<dyn Store>,
}

impl AddRoleService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn add_role(
        &self,
        user_id: &str,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<(), RoleError> {
        let user_id = parse_id("user_id", user_id)?;
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(RoleError::UserNotFound(user_id))?;

        let role_name: RoleName = resource_type
            .parse()
            .map_err(|_| RoleError::InvalidResourceType(resource_type.to_string()))?;

        let Some(kind) = role_name.resource_type() else {
            // Global role, no resource to resolve
            self.grant(&user, role_name, None).await?;
            tracing::info!("Granted {} to user {}", role_name, user.id);
            return Ok(());
        };

        let resource_id = parse_id("resource_id", resource_id)?;
        let resource_name = self.resource_name(kind, resource_id).await?;
        let scope = Some((kind, resource_id));

        if self.store.user_has_role(user.id, role_name, scope).await? {
            return Err(RoleError::AlreadyHasRole {
                user: user.display_name().to_string(),
                resource: resource_name,
            });
        }

        self.grant(&user, role_name, scope).await?;
        if role_name == RoleName::OrgAdmin {
            // An organization admin is always also a user of that organization
            self.grant(&user, RoleName::OrgUser, scope).await?;
        }

        tracing::info!(
            "Granted {} on {} {} to user {}",
            role_name,
            kind.as_str(),
            resource_id,
            user.id
        );
        Ok(())
    }

    async fn grant(
        &self,
        user: &User,
        role_name: RoleName,
        scope: Option<(ResourceType, i64)>,
    ) -> Result<(), RoleError> {
        let role = self.store.find_or_create_role(role_name, scope).await?;
        self.store.link_role(user.id, role.id).await?;
        Ok(())
    }

    async fn resource_name(&self, kind: ResourceType, id: i64) -> Result<String, RoleError> {
        let name = match kind {
            ResourceType::Organization => self.store.find_organization(id).await?.map(|o| o.name),
            ResourceType::Partner => self.store.find_partner(id).await?.map(|p| p.name),
        };
        name.ok_or(RoleError::ResourceNotFound {
            kind: kind.as_str(),
            id,
        })
    }
}

#[async_trait]
impl RoleAssigner for AddRoleService {
    async fn call(&self, user_id: &str, resource_type: &str, resource_id: &str) -> anyhow::Result<()> {
        Ok(self.add_role(user_id, resource_type, resource_id).await?)
    }
}
