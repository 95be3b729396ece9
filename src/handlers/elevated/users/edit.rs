// handlers/elevated/users/edit.rs - GET /admin/users/:id/edit

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use minijinja::context;
use serde::Serialize;

use super::{find_user, form_view, UserForm};
use crate::database::models::{ResourceType, Role, RoleName, User};
use crate::error::ApiError;
use crate::middleware::{CurrentUser, Flash};
use crate::state::AppState;

/// A held role with the name of the resource it is scoped to
#[derive(Debug, Serialize)]
pub struct RoleView {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub resource_type: Option<String>,
    pub resource_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct RoleKind {
    name: &'static str,
    title: &'static str,
}

pub async fn users_edit(
    State(state): State<AppState>,
    current: CurrentUser,
    flash: Flash,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = find_user(&state, &id).await?;
    let form = UserForm::from_user(&user);
    render_edit(&state, &current, &flash, &user, &form, &[], StatusCode::OK).await
}

pub(crate) async fn render_edit(
    state: &AppState,
    current: &CurrentUser,
    flash: &Flash,
    user: &User,
    form: &UserForm,
    errors: &[String],
    status: StatusCode,
) -> Result<Response, ApiError> {
    let organization_name = match user.organization_id {
        Some(id) => state.store.find_organization(id).await?.map(|o| o.name),
        None => None,
    };

    let held = state.store.roles_for_user(user.id).await?;
    let mut roles = Vec::with_capacity(held.len());
    for role in held {
        roles.push(role_view(state, role).await?);
    }

    let organizations = state.store.list_organizations().await?;
    let role_kinds: Vec<RoleKind> = RoleName::ALL
        .iter()
        .map(|kind| RoleKind {
            name: kind.as_str(),
            title: kind.title(),
        })
        .collect();

    let mut response = state.views.page(
        "admin/users/edit.html",
        Some(current),
        flash,
        context! {
            user,
            organization_name,
            roles,
            role_kinds,
            organizations,
            form => form_view(form),
            errors,
        },
    )?;
    *response.status_mut() = status;
    Ok(response)
}

async fn role_view(state: &AppState, role: Role) -> Result<RoleView, ApiError> {
    let kind = role.resource_type.as_deref().and_then(ResourceType::parse);
    let resource_name = match (kind, role.resource_id) {
        (Some(ResourceType::Organization), Some(id)) => {
            state.store.find_organization(id).await?.map(|o| o.name)
        }
        (Some(ResourceType::Partner), Some(id)) => state.store.find_partner(id).await?.map(|p| p.name),
        _ => None,
    };
    let title = role
        .role_name()
        .map(|name| name.title().to_string())
        .unwrap_or_else(|| role.name.clone());

    Ok(RoleView {
        id: role.id,
        title,
        name: role.name,
        resource_type: role.resource_type,
        resource_name,
    })
}
