#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{header, redirect, Client, RequestBuilder, Response};

use admin_users::app::app;
use admin_users::auth::session_token;
use admin_users::config::SecurityConfig;
use admin_users::database::models::{Organization, Partner, User};
use admin_users::database::{seed_demo, MemoryStore, Store};
use admin_users::middleware::flash::{Flash, FLASH_COOKIE};
use admin_users::state::AppState;

/// A running app over an in-memory store filled by `seed_demo`.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub store: Arc<dyn Store>,
    pub org: Organization,
    pub partner: Partner,
    pub super_admin: User,
    pub org_admin: User,
    pub user: User,
    security: SecurityConfig,
}

pub async fn spawn_server() -> Result<TestServer> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let demo = seed_demo(store.as_ref()).await?;

    let security = SecurityConfig {
        jwt_secret: "integration-secret".to_string(),
        jwt_expiry_hours: 1,
        session_cookie: "admin_session".to_string(),
        secure_cookies: false,
    };

    let state = AppState::new(store.clone(), security.clone())?;
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let router = app(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: Client::builder().redirect(redirect::Policy::none()).build()?,
        store,
        org: demo.org,
        partner: demo.partner,
        super_admin: demo.super_admin,
        org_admin: demo.org_admin,
        user: demo.user,
        security,
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token_for(&self, user: &User) -> String {
        session_token(user.id, &user.email, &self.security).expect("token")
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn get_as(&self, user: &User, path: &str) -> RequestBuilder {
        self.get(path).bearer_auth(self.token_for(user))
    }

    pub fn post_as(&self, user: &User, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(self.token_for(user))
    }

    pub fn patch_as(&self, user: &User, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path)).bearer_auth(self.token_for(user))
    }

    pub fn delete_as(&self, user: &User, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(self.token_for(user))
    }

    pub async fn user_count(&self) -> usize {
        self.store.list_users(None).await.expect("list users").len()
    }
}

pub fn location(res: &Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// The flash a response leaves behind, empty when it sets none.
pub fn flash_of(res: &Response) -> Flash {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.strip_prefix(FLASH_COOKIE)?.strip_prefix('='))
        .map(|rest| Flash::decode(rest.split(';').next().unwrap_or_default()))
        .last()
        .unwrap_or_default()
}

/// `user[...]` form fields as a browser would post them.
pub fn user_form<'a>(name: &'a str, email: &'a str, organization_id: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("user[name]", name),
        ("user[email]", email),
        ("user[organization_id]", organization_id),
    ]
}
