// handlers/elevated/users/roles.rs - role grant and revoke
//
// POST   /admin/users/:id/add_role     resource_type, resource_id
// DELETE /admin/users/:id/remove_role  role_id (POST accepted for forms)
//
// Both hand the raw parameters to a collaborator and always answer with a
// redirect back to the referring page: a notice on success, the
// collaborator's error message as an alert on failure.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    Form,
};
use serde::Deserialize;

use crate::handlers::paths;
use crate::middleware::FlashRedirect;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AddRoleParams {
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveRoleParams {
    pub role_id: Option<String>,
}

/// Where to send the administrator afterwards: the `Referer`, else the
/// user's edit page, else the listing when the id is not a user id at all.
fn back(headers: &HeaderMap, user_id: &str) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match user_id.trim().parse::<i64>() {
            Ok(id) => paths::edit_admin_user(id),
            Err(_) => paths::ADMIN_USERS.to_string(),
        })
}

pub async fn add_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<AddRoleParams>,
    body: Option<Form<AddRoleParams>>,
) -> FlashRedirect {
    let body = body.map(|Form(body)| body).unwrap_or_default();
    let resource_type = body.resource_type.or(query.resource_type).unwrap_or_default();
    let resource_id = body.resource_id.or(query.resource_id).unwrap_or_default();
    let location = back(&headers, &user_id);

    match state
        .role_assigner
        .call(&user_id, &resource_type, &resource_id)
        .await
    {
        Ok(()) => FlashRedirect::notice(location, "Role added!"),
        Err(e) => {
            tracing::warn!(
                "add_role failed for user {} ({} {}): {:#}",
                user_id,
                resource_type,
                resource_id,
                e
            );
            FlashRedirect::alert(location, e.to_string())
        }
    }
}

pub async fn remove_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<RemoveRoleParams>,
    body: Option<Form<RemoveRoleParams>>,
) -> FlashRedirect {
    let body = body.map(|Form(body)| body).unwrap_or_default();
    let role_id = body.role_id.or(query.role_id).unwrap_or_default();
    let location = back(&headers, &user_id);

    match state.role_remover.call(&user_id, &role_id).await {
        Ok(()) => FlashRedirect::notice(location, "Role removed!"),
        Err(e) => {
            tracing::warn!("remove_role failed for user {} (role {}): {:#}", user_id, role_id, e);
            FlashRedirect::alert(location, e.to_string())
        }
    }
}
