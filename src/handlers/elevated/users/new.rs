// handlers/elevated/users/new.rs - GET /admin/users/new

use axum::{extract::State, http::StatusCode, response::Response};
use minijinja::context;

use super::{form_view, UserForm};
use crate::error::ApiError;
use crate::middleware::{CurrentUser, Flash};
use crate::state::AppState;

pub async fn users_new(
    State(state): State<AppState>,
    current: CurrentUser,
    flash: Flash,
) -> Result<Response, ApiError> {
    render_new(&state, &current, &flash, &UserForm::default(), &[], StatusCode::OK).await
}

/// The creation form with every organization, alphabetized, to choose from.
pub(crate) async fn render_new(
    state: &AppState,
    current: &CurrentUser,
    flash: &Flash,
    form: &UserForm,
    errors: &[String],
    status: StatusCode,
) -> Result<Response, ApiError> {
    let organizations = state.store.list_organizations().await?;

    let mut response = state.views.page(
        "admin/users/new.html",
        Some(current),
        flash,
        context! {
            organizations,
            form => form_view(form),
            errors,
        },
    )?;
    *response.status_mut() = status;
    Ok(response)
}
