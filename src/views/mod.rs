use axum::{
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
};
use minijinja::{context, Environment, Value};
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{CurrentUser, Flash};

/// Server-rendered pages, embedded at compile time
pub struct Views {
    env: Environment<'static>,
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("templates/layout.html")),
    ("dashboard.html", include_str!("templates/dashboard.html")),
    ("auth/sign_in.html", include_str!("templates/auth/sign_in.html")),
    ("admin/users/index.html", include_str!("templates/admin/users/index.html")),
    ("admin/users/new.html", include_str!("templates/admin/users/new.html")),
    ("admin/users/edit.html", include_str!("templates/admin/users/edit.html")),
    (
        "admin/users/_organization_select.html",
        include_str!("templates/admin/users/_organization_select.html"),
    ),
];

/// What every page knows about the signed-in user
#[derive(Debug, Serialize)]
struct Viewer<'a> {
    id: i64,
    name: &'a str,
    email: &'a str,
    super_admin: bool,
}

#[derive(Debug, Serialize)]
struct FlashView<'a> {
    notice: Option<&'a str>,
    alert: Option<&'a str>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// Render a full page. A flash that was pending is shown here and
    /// cleared from the browser.
    pub fn page(
        &self,
        name: &str,
        current_user: Option<&CurrentUser>,
        flash: &Flash,
        ctx: Value,
    ) -> Result<Response, ApiError> {
        let viewer = current_user.map(|current| Viewer {
            id: current.user.id,
            name: current.user.display_name(),
            email: &current.user.email,
            super_admin: current.is_super_admin(),
        });
        let flash_view = FlashView {
            notice: flash.notice.as_deref(),
            alert: flash.alert.as_deref(),
        };
        let ctx = context! {
            current_user => viewer,
            flash => flash_view,
            ..ctx
        };

        let html = self.render(name, ctx)?;
        let mut response = Html(html).into_response();
        if !flash.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&Flash::clear_cookie()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_parse() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "auth/sign_in.html",
                context! { flash => context! {}, current_user => () },
            )
            .unwrap();
        assert!(html.contains("Sign in"));
    }

    #[test]
    fn flash_is_escaped() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "auth/sign_in.html",
                context! { flash => context! { alert => "<script>" }, current_user => () },
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn pending_flash_is_cleared_once_shown() {
        let views = Views::new().unwrap();

        let shown = views
            .page("auth/sign_in.html", None, &Flash::notice("Hi"), context! {})
            .unwrap();
        let quiet = views
            .page("auth/sign_in.html", None, &Flash::default(), context! {})
            .unwrap();

        assert!(shown.headers().contains_key(header::SET_COOKIE));
        assert!(!quiet.headers().contains_key(header::SET_COOKIE));
    }
}
