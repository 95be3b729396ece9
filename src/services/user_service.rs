use std::sync::Arc;
use thiserror::Error;

use crate::database::models::{ResourceType, RoleName, User, UserAttrs};
use crate::database::{Store, StoreError};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{}", .0.join(", "))]
    Invalid(Vec<String>),

    #[error("Couldn't find User with id {0}")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates and edits users on behalf of an administrator
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a user inside an organization and make them a member of it.
    pub async fn create(&self, attrs: UserAttrs) -> Result<User, UserError> {
        let attrs = normalize(attrs);
        self.validate(&attrs, None).await?;

        let user = self.store.create_user(&attrs).await.map_err(conflict_to_invalid)?;

        if let Some(organization_id) = user.organization_id {
            let scope = Some((ResourceType::Organization, organization_id));
            let role = self.store.find_or_create_role(RoleName::OrgUser, scope).await?;
            self.store.link_role(user.id, role.id).await?;
        }

        tracing::info!("Created user {} <{}>", user.id, user.email);
        Ok(user)
    }

    pub async fn update(&self, id: i64, attrs: UserAttrs) -> Result<User, UserError> {
        let attrs = normalize(attrs);
        if self.store.find_user(id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }
        self.validate(&attrs, Some(id)).await?;

        let user = self
            .store
            .update_user(id, &attrs)
            .await
            .map_err(conflict_to_invalid)?;
        tracing::info!("Updated user {}", user.id);
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<User, UserError> {
        let user = self.store.find_user(id).await?.ok_or(UserError::NotFound(id))?;
        self.store.delete_user(id).await?;
        tracing::info!("Deleted user {} <{}>", user.id, user.email);
        Ok(user)
    }

    async fn validate(&self, attrs: &UserAttrs, existing: Option<i64>) -> Result<(), UserError> {
        let mut errors = Vec::new();

        if attrs.email.is_empty() {
            errors.push("Email can't be blank".to_string());
        } else if !looks_like_email(&attrs.email) {
            errors.push("Email is invalid".to_string());
        } else if let Some(other) = self.store.find_user_by_email(&attrs.email).await? {
            if Some(other.id) != existing {
                errors.push("Email has already been taken".to_string());
            }
        }

        match attrs.organization_id {
            None => errors.push("Organization must exist".to_string()),
            Some(id) => {
                if self.store.find_organization(id).await?.is_none() {
                    errors.push("Organization must exist".to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(UserError::Invalid(errors))
        }
    }
}

fn normalize(attrs: UserAttrs) -> UserAttrs {
    UserAttrs {
        name: attrs.name.trim().to_string(),
        email: attrs.email.trim().to_lowercase(),
        organization_id: attrs.organization_id,
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

// A concurrent insert can still win the unique index
fn conflict_to_invalid(err: StoreError) -> UserError {
    match err {
        StoreError::Conflict(_) => UserError::Invalid(vec!["Email has already been taken".to_string()]),
        other => UserError::Store(other),
    }
}
