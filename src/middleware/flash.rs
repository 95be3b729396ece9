use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

use super::cookies::{build_cookie, cookie_value, expired_cookie};
use crate::handlers::paths;

pub const FLASH_COOKIE: &str = "flash";

/// One-shot messages carried across a redirect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    pub notice: Option<String>,
    pub alert: Option<String>,
}

impl Flash {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            notice: Some(message.into()),
            alert: None,
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            notice: None,
            alert: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notice.is_none() && self.alert.is_none()
    }

    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(notice) = &self.notice {
            serializer.append_pair("notice", notice);
        }
        if let Some(alert) = &self.alert {
            serializer.append_pair("alert", alert);
        }
        serializer.finish()
    }

    pub fn decode(value: &str) -> Self {
        let mut flash = Flash::default();
        for (key, value) in url::form_urlencoded::parse(value.as_bytes()) {
            match key.as_ref() {
                "notice" => flash.notice = Some(value.into_owned()),
                "alert" => flash.alert = Some(value.into_owned()),
                _ => {}
            }
        }
        flash
    }

    /// `Set-Cookie` value that consumes the flash once it has been shown.
    pub fn clear_cookie() -> String {
        expired_cookie(FLASH_COOKIE)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(cookie_value(&parts.headers, FLASH_COOKIE)
            .map(|value| Flash::decode(&value))
            .unwrap_or_default())
    }
}

/// Redirect that leaves a flash message for the next rendered page
#[derive(Debug)]
pub struct FlashRedirect {
    pub location: String,
    pub flash: Flash,
}

impl FlashRedirect {
    pub fn notice(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flash: Flash::notice(message),
        }
    }

    pub fn alert(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            flash: Flash::alert(message),
        }
    }
}

impl IntoResponse for FlashRedirect {
    /// `303 See Other`. A location that cannot be a header value is
    /// replaced by the site root.
    fn into_response(self) -> Response {
        let location = HeaderValue::from_str(&self.location).unwrap_or_else(|_| {
            tracing::warn!("Unencodable redirect target {:?}, using {}", self.location, paths::ROOT);
            HeaderValue::from_static(paths::ROOT)
        });
        let mut response = (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
        let cookie = build_cookie(FLASH_COOKIE, &self.flash.encode(), None, false);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("Dropping unencodable flash cookie: {}", e),
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_survives_cookie_encoding() {
        let flash = Flash::alert("User A&B already has role; for \"X\"");
        assert_eq!(Flash::decode(&flash.encode()), flash);
    }

    #[test]
    fn garbage_decodes_to_empty() {
        assert!(Flash::decode("whatever=1").is_empty());
    }

    #[test]
    fn redirect_sets_location_and_cookie() {
        let response = FlashRedirect::notice("/back/url", "Role added!").into_response();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/back/url");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=notice=Role+added%21;"));
    }

    #[test]
    fn unencodable_location_falls_back_to_root() {
        let response = FlashRedirect::alert("/admin/users/\n/edit", "Invalid user_id").into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=alert=Invalid+user_id;"));
    }
}
