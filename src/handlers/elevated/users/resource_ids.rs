// handlers/elevated/users/resource_ids.rs - GET /admin/users/resource_ids
//
// Candidate resources for the role picker: organizations for the
// organization roles, partners for `partner`, nothing for `super_admin`.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::database::models::{ResourceType, RoleName};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourceIdsQuery {
    pub resource_type: String,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResourceOption {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ResourceOptions {
    pub results: Vec<ResourceOption>,
}

pub async fn resource_ids(
    State(state): State<AppState>,
    Query(query): Query<ResourceIdsQuery>,
) -> ApiResult<ResourceOptions> {
    let role_name: RoleName = query.resource_type.parse().map_err(ApiError::bad_request)?;

    let candidates: Vec<ResourceOption> = match role_name.resource_type() {
        Some(ResourceType::Organization) => state
            .store
            .list_organizations()
            .await?
            .into_iter()
            .map(|o| ResourceOption { id: o.id, text: o.name })
            .collect(),
        Some(ResourceType::Partner) => state
            .store
            .list_partners()
            .await?
            .into_iter()
            .map(|p| ResourceOption { id: p.id, text: p.name })
            .collect(),
        None => Vec::new(),
    };

    let needle = query.q.as_deref().map(str::trim).unwrap_or("").to_lowercase();
    let results = candidates
        .into_iter()
        .filter(|option| needle.is_empty() || option.text.to_lowercase().contains(&needle))
        .collect();

    Ok(ApiResponse::success(ResourceOptions { results }))
}
