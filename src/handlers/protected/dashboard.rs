// handlers/protected/dashboard.rs - GET /dashboard
//
// Landing page for every signed-in user and the destination of every
// denied admin request.

use axum::{extract::State, response::Response};
use minijinja::context;

use crate::error::ApiError;
use crate::middleware::{CurrentUser, Flash};
use crate::state::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    flash: Flash,
) -> Result<Response, ApiError> {
    state
        .views
        .page("dashboard.html", Some(&current), &flash, context! {})
}
