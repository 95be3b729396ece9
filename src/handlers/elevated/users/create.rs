// handlers/elevated/users/create.rs - POST /admin/users

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::new::render_new;
use super::UserForm;
use crate::error::ApiError;
use crate::handlers::paths;
use crate::middleware::{CurrentUser, Flash, FlashRedirect};
use crate::services::UserError;
use crate::state::AppState;

/// Create a user under the submitted organization. Validation failures
/// re-render the form with the same organization list.
pub async fn users_create(
    State(state): State<AppState>,
    current: CurrentUser,
    form: UserForm,
) -> Result<Response, ApiError> {
    match state.users.create(form.to_attrs()).await {
        Ok(user) => {
            tracing::info!("User {} created by {}", user.id, current.user.id);
            Ok(FlashRedirect::notice(
                paths::admin_users(paths::ALL_ORGANIZATIONS),
                "Created a new user!",
            )
            .into_response())
        }
        Err(UserError::Invalid(errors)) => {
            let flash = Flash::alert("Failed to create user");
            render_new(&state, &current, &flash, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY).await
        }
        Err(other) => Err(other.into()),
    }
}
