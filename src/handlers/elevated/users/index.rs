// handlers/elevated/users/index.rs - GET /admin/users?organization_id=<id|admin>

use axum::{
    extract::{Query, State},
    response::Response,
};
use minijinja::context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::paths;
use crate::middleware::{CurrentUser, Flash};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub organization_id: Option<String>,
}

impl IndexQuery {
    /// `admin`, blank and absent all mean every organization.
    pub fn organization_filter(&self) -> Result<Option<i64>, ApiError> {
        match self.organization_id.as_deref().map(str::trim) {
            None | Some("") | Some(paths::ALL_ORGANIZATIONS) => Ok(None),
            Some(id) => id
                .parse()
                .map(Some)
                .map_err(|_| ApiError::bad_request(format!("Invalid organization_id: {}", id))),
        }
    }
}

#[derive(Debug, Serialize)]
struct UserRow {
    user: User,
    organization_name: Option<String>,
}

pub async fn users_index(
    State(state): State<AppState>,
    current: CurrentUser,
    flash: Flash,
    Query(query): Query<IndexQuery>,
) -> Result<Response, ApiError> {
    let selected_organization = query.organization_filter()?;

    let organizations = state.store.list_organizations().await?;
    let names: HashMap<i64, &str> = organizations
        .iter()
        .map(|o| (o.id, o.name.as_str()))
        .collect();

    let users: Vec<UserRow> = state
        .store
        .list_users(selected_organization)
        .await?
        .into_iter()
        .map(|user| UserRow {
            organization_name: user
                .organization_id
                .and_then(|id| names.get(&id).map(|name| name.to_string())),
            user,
        })
        .collect();

    state.views.page(
        "admin/users/index.html",
        Some(&current),
        &flash,
        context! {
            users,
            organizations,
            selected_organization,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(id: Option<&str>) -> IndexQuery {
        IndexQuery {
            organization_id: id.map(str::to_string),
        }
    }

    #[test]
    fn admin_means_everyone() {
        assert_eq!(query(Some("admin")).organization_filter().unwrap(), None);
        assert_eq!(query(None).organization_filter().unwrap(), None);
        assert_eq!(query(Some("12")).organization_filter().unwrap(), Some(12));
        assert!(query(Some("twelve")).organization_filter().is_err());
    }
}
