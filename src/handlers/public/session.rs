// handlers/public/session.rs - sign-in page and session cookie management
//
// GET  /auth/sign_in         render the sign-in form
// POST /auth/session         exchange a session token for the session cookie
// DELETE /auth/session       sign out (POST /auth/session/delete for forms)

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::handlers::paths;
use crate::middleware::cookies::{build_cookie, expired_cookie};
use crate::middleware::{Flash, FlashRedirect};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionForm {
    pub token: String,
}

pub async fn sign_in(State(state): State<AppState>, flash: Flash) -> Result<Response, ApiError> {
    state.views.page("auth/sign_in.html", None, &flash, context! {})
}

pub async fn session_create(
    State(state): State<AppState>,
    Form(form): Form<SessionForm>,
) -> Result<Response, ApiError> {
    let token = form.token.trim();

    let claims = match validate_jwt(token, &state.security) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Sign-in with bad token: {}", e);
            return Ok(FlashRedirect::alert(paths::SIGN_IN, "Invalid session token").into_response());
        }
    };
    if state.store.find_user(claims.user_id).await?.is_none() {
        tracing::warn!("Sign-in for unknown user {}", claims.user_id);
        return Ok(FlashRedirect::alert(paths::SIGN_IN, "Invalid session token").into_response());
    }

    let max_age = state.security.jwt_expiry_hours * 3600;
    let cookie = build_cookie(
        &state.security.session_cookie,
        token,
        Some(max_age),
        state.security.secure_cookies,
    );
    let cookie = HeaderValue::from_str(&cookie).map_err(|_| ApiError::bad_request("Malformed session token"))?;

    tracing::info!("User {} signed in", claims.user_id);
    let mut response = FlashRedirect::notice(paths::DASHBOARD, "Signed in successfully.").into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}

pub async fn session_destroy(State(state): State<AppState>) -> Response {
    let mut response = FlashRedirect::notice(paths::SIGN_IN, "Signed out successfully.").into_response();
    if let Ok(value) = HeaderValue::from_str(&expired_cookie(&state.security.session_cookie)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
