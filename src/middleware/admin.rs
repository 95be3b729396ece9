use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::session::CurrentUser;
use crate::handlers::paths;

/// Outcome of the super-admin check made once per admin request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminGate {
    Authorized,
    Denied,
}

impl AdminGate {
    pub fn check(current: Option<&CurrentUser>) -> Self {
        match current {
            Some(current) if current.is_super_admin() => AdminGate::Authorized,
            _ => AdminGate::Denied,
        }
    }
}

/// Lets super admins through; everyone else goes to the dashboard untouched.
///
/// Must run after [`super::session_middleware`].
pub async fn require_super_admin(request: Request, next: Next) -> Response {
    match AdminGate::check(request.extensions().get::<CurrentUser>()) {
        AdminGate::Authorized => next.run(request).await,
        AdminGate::Denied => {
            let user_id = request.extensions().get::<CurrentUser>().map(|c| c.user.id);
            tracing::warn!(
                "Denied {} {} for user {:?}",
                request.method(),
                request.uri().path(),
                user_id
            );
            Redirect::to(paths::DASHBOARD).into_response()
        }
    }
}
