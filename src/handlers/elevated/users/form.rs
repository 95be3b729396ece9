// handlers/elevated/users/form.rs - `user[...]` parameters for create and update
//
// Browsers post `user[name]=..&user[email]=..&user[organization_id]=..`;
// API clients may send `{"user": {...}}` as JSON instead.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::models::{User, UserAttrs};
use crate::error::ApiError;

/// Submitted user attributes, kept as text so the form can be re-rendered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub organization_id: Option<String>,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            organization_id: user.organization_id.map(|id| id.to_string()),
        }
    }

    /// An unparseable organization id is treated as missing.
    pub fn to_attrs(&self) -> UserAttrs {
        UserAttrs {
            name: self.name.clone(),
            email: self.email.clone(),
            organization_id: self.organization_id(),
        }
    }

    pub fn organization_id(&self) -> Option<i64> {
        self.organization_id
            .as_deref()
            .and_then(|id| id.trim().parse().ok())
    }
}

#[derive(Debug, Deserialize)]
struct FlatUserForm {
    #[serde(rename = "user[name]", default)]
    name: Option<String>,
    #[serde(rename = "user[email]", default)]
    email: Option<String>,
    #[serde(rename = "user[organization_id]", default)]
    organization_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonUserBody {
    #[serde(default)]
    user: JsonUser,
}

#[derive(Debug, Default, Deserialize)]
struct JsonUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    organization_id: Option<Value>,
}

fn id_text(value: Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        _ => None,
    }
}

#[async_trait]
impl<S> FromRequest<S> for UserForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(body) = Json::<JsonUserBody>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(UserForm {
                name: body.user.name.unwrap_or_default(),
                email: body.user.email.unwrap_or_default(),
                organization_id: body.user.organization_id.and_then(id_text),
            })
        } else {
            let Form(body) = Form::<FlatUserForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            Ok(UserForm {
                name: body.name.unwrap_or_default(),
                email: body.email.unwrap_or_default(),
                organization_id: body.organization_id.filter(|id| !id.trim().is_empty()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(content_type: &str, body: &'static str) -> UserForm {
        let request = Request::builder()
            .method("POST")
            .uri("/admin/users")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        UserForm::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn reads_bracketed_form_fields() {
        let form = extract(
            "application/x-www-form-urlencoded",
            "user%5Bemail%5D=email%40email.com&user%5Borganization_id%5D=1",
        )
        .await;

        assert_eq!(form.email, "email@email.com");
        assert_eq!(form.organization_id(), Some(1));
        assert_eq!(form.name, "");
    }

    #[tokio::test]
    async fn reads_nested_json_with_numeric_id() {
        let form = extract(
            "application/json",
            r#"{"user": {"email": "email@email.com", "organization_id": 1}}"#,
        )
        .await;

        assert_eq!(form.to_attrs().organization_id, Some(1));
    }

    #[tokio::test]
    async fn blank_organization_is_missing() {
        let form = extract("application/x-www-form-urlencoded", "user%5Borganization_id%5D=").await;
        assert_eq!(form.organization_id, None);
    }
}
