// handlers/elevated/users/update.rs - PATCH /admin/users/:id (POST for forms)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::edit::render_edit;
use super::{find_user, UserForm};
use crate::error::ApiError;
use crate::handlers::paths;
use crate::middleware::{CurrentUser, Flash, FlashRedirect};
use crate::services::UserError;
use crate::state::AppState;

pub async fn users_update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    form: UserForm,
) -> Result<Response, ApiError> {
    let user = find_user(&state, &id).await?;

    match state.users.update(user.id, form.to_attrs()).await {
        Ok(updated) => Ok(FlashRedirect::notice(
            paths::admin_users(paths::ALL_ORGANIZATIONS),
            format!("{} updated!", updated.display_name()),
        )
        .into_response()),
        Err(UserError::Invalid(errors)) => {
            let flash = Flash::alert("Failed to update this user.");
            render_edit(&state, &current, &flash, &user, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY).await
        }
        Err(other) => Err(other.into()),
    }
}
