use thiserror::Error;

use crate::database::StoreError;

/// Failures from granting or revoking a role. Messages are shown to the
/// administrator verbatim.
#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Invalid {field}: {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error("Couldn't find User with id {0}")]
    UserNotFound(i64),

    #[error("Invalid resource type {0}")]
    InvalidResourceType(String),

    #[error("Couldn't find {kind} with id {id}")]
    ResourceNotFound { kind: &'static str, id: i64 },

    #[error("User {user} already has role for {resource}")]
    AlreadyHasRole { user: String, resource: String },

    #[error("User {0} does not have role!")]
    MissingRole(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ids arrive as text from request parameters.
pub(crate) fn parse_id(field: &'static str, value: &str) -> Result<i64, RoleError> {
    value.trim().parse::<i64>().map_err(|_| RoleError::InvalidId {
        field,
        value: value.to_string(),
    })
}
