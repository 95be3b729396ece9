// handlers/elevated/users/destroy.rs - DELETE /admin/users/:id (POST .../delete for forms)

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use super::find_user;
use crate::error::ApiError;
use crate::handlers::paths;
use crate::middleware::{CurrentUser, FlashRedirect};
use crate::state::AppState;

pub async fn users_destroy(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = find_user(&state, &id).await?;
    if user.id == current.user.id {
        return Ok(FlashRedirect::alert(
            paths::admin_users(paths::ALL_ORGANIZATIONS),
            "You cannot delete yourself.",
        )
        .into_response());
    }

    let deleted = state.users.delete(user.id).await?;
    tracing::info!("User {} deleted by {}", deleted.id, current.user.id);

    Ok(FlashRedirect::notice(
        paths::admin_users(paths::ALL_ORGANIZATIONS),
        format!("{} has been deleted.", deleted.display_name()),
    )
    .into_response())
}
