use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::cookies::cookie_value;
use crate::auth::validate_jwt;
use crate::database::models::{Role, RoleName, User};
use crate::error::ApiError;
use crate::handlers::paths;
use crate::state::AppState;

/// What a signed-in user may reach, derived from their roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    SuperAdmin,
    OrganizationAdmin,
    User,
}

/// The signed-in user with their roles, loaded once per request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn access_level(&self) -> AccessLevel {
        let has = |name: RoleName| self.roles.iter().any(|r| r.name == name.as_str());
        if has(RoleName::SuperAdmin) {
            AccessLevel::SuperAdmin
        } else if has(RoleName::OrgAdmin) {
            AccessLevel::OrganizationAdmin
        } else {
            AccessLevel::User
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.access_level() == AccessLevel::SuperAdmin
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Session required"))
    }
}

/// Resolves the session token to a [`CurrentUser`]. Requests without a
/// valid session are sent to the sign-in page.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(request.headers(), &state.security.session_cookie) else {
        tracing::debug!("No session on {}", request.uri().path());
        return Redirect::to(paths::SIGN_IN).into_response();
    };

    let claims = match validate_jwt(&token, &state.security) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Rejected session token: {}", e);
            return Redirect::to(paths::SIGN_IN).into_response();
        }
    };

    let current = match load_current_user(&state, claims.user_id).await {
        Ok(Some(current)) => current,
        Ok(None) => {
            tracing::warn!("Session for unknown user {}", claims.user_id);
            return Redirect::to(paths::SIGN_IN).into_response();
        }
        Err(e) => return e.into_response(),
    };

    tracing::debug!(
        "Session user {} ({:?}) on {}",
        current.user.id,
        current.access_level(),
        request.uri().path()
    );
    request.extensions_mut().insert(current);
    next.run(request).await
}

async fn load_current_user(state: &AppState, user_id: i64) -> Result<Option<CurrentUser>, ApiError> {
    let Some(user) = state.store.find_user(user_id).await? else {
        return Ok(None);
    };
    let roles = state.store.roles_for_user(user.id).await?;
    Ok(Some(CurrentUser { user, roles }))
}

/// Session token from a Bearer header, else from the session cookie
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| cookie_value(headers, cookie_name).filter(|token| !token.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn role(name: RoleName) -> Role {
        Role {
            id: 1,
            name: name.as_str().to_string(),
            resource_type: None,
            resource_id: None,
            created_at: Utc::now(),
        }
    }

    fn current(roles: Vec<Role>) -> CurrentUser {
        let now = Utc::now();
        CurrentUser {
            user: User {
                id: 1,
                name: "A".to_string(),
                email: "a@example.com".to_string(),
                organization_id: None,
                created_at: now,
                updated_at: now,
            },
            roles,
        }
    }

    #[test]
    fn super_admin_outranks_org_admin() {
        let user = current(vec![role(RoleName::OrgAdmin), role(RoleName::SuperAdmin)]);
        assert_eq!(user.access_level(), AccessLevel::SuperAdmin);
    }

    #[test]
    fn org_admin_is_not_super_admin() {
        let user = current(vec![role(RoleName::OrgUser), role(RoleName::OrgAdmin)]);
        assert_eq!(user.access_level(), AccessLevel::OrganizationAdmin);
        assert!(!user.is_super_admin());
        assert_eq!(current(vec![]).access_level(), AccessLevel::User);
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("admin_session=xyz"));
        assert_eq!(extract_token(&headers, "admin_session").as_deref(), Some("abc"));

        headers.remove(header::AUTHORIZATION);
        assert_eq!(extract_token(&headers, "admin_session").as_deref(), Some("xyz"));

        headers.insert(header::COOKIE, HeaderValue::from_static("admin_session="));
        assert_eq!(extract_token(&headers, "admin_session"), None);
    }
}
