use async_trait::async_trait;
use thiserror::Error;

use super::models::{Organization, Partner, ResourceType, Role, RoleName, User, UserAttrs};

/// Errors from any [`Store`] backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Scope of a role row: a resource kind and id, or nothing for global roles.
pub type RoleResource = Option<(ResourceType, i64)>;

/// Persistence for organizations, partners, users and their roles.
///
/// Lists of organizations are always returned alphabetized; lists of users
/// are ordered by name.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError>;
    async fn find_organization(&self, id: i64) -> Result<Option<Organization>, StoreError>;
    async fn create_organization(&self, name: &str) -> Result<Organization, StoreError>;

    async fn list_partners(&self) -> Result<Vec<Partner>, StoreError>;
    async fn find_partner(&self, id: i64) -> Result<Option<Partner>, StoreError>;
    async fn create_partner(
        &self,
        name: &str,
        organization_id: Option<i64>,
    ) -> Result<Partner, StoreError>;

    /// All users, or only those belonging to `organization_id`.
    async fn list_users(&self, organization_id: Option<i64>) -> Result<Vec<User>, StoreError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, attrs: &UserAttrs) -> Result<User, StoreError>;
    async fn update_user(&self, id: i64, attrs: &UserAttrs) -> Result<User, StoreError>;
    /// Deletes the user and every role link they hold.
    async fn delete_user(&self, id: i64) -> Result<(), StoreError>;

    async fn find_role_by(
        &self,
        name: RoleName,
        resource: RoleResource,
    ) -> Result<Option<Role>, StoreError>;
    async fn find_or_create_role(
        &self,
        name: RoleName,
        resource: RoleResource,
    ) -> Result<Role, StoreError>;
    async fn roles_for_user(&self, user_id: i64) -> Result<Vec<Role>, StoreError>;
    /// Links a user to a role. Linking twice is a no-op.
    async fn link_role(&self, user_id: i64, role_id: i64) -> Result<(), StoreError>;
    /// Returns whether a link existed.
    async fn unlink_role(&self, user_id: i64, role_id: i64) -> Result<bool, StoreError>;

    async fn user_has_role(
        &self,
        user_id: i64,
        name: RoleName,
        resource: RoleResource,
    ) -> Result<bool, StoreError> {
        let roles = self.roles_for_user(user_id).await?;
        Ok(roles.iter().any(|role| role_matches(role, name, resource)))
    }
}

pub(crate) fn role_matches(role: &Role, name: RoleName, resource: RoleResource) -> bool {
    let scope = match resource {
        Some((kind, id)) => (Some(kind.as_str()), Some(id)),
        None => (None, None),
    };
    role.name == name.as_str() && (role.resource_type.as_deref(), role.resource_id) == scope
}
