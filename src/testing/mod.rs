//! In-process server harness for handler tests that need mock collaborators.

use reqwest::header::SET_COOKIE;
use reqwest::{redirect, Client, RequestBuilder};
use std::sync::Arc;

use crate::app::app;
use crate::auth::session_token;
use crate::config::SecurityConfig;
use crate::database::models::{Organization, Partner, User};
use crate::database::{seed_demo, MemoryStore, Store};
use crate::middleware::flash::{Flash, FLASH_COOKIE};
use crate::state::AppState;

/// An in-memory store filled by `seed_demo`.
pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub security: SecurityConfig,
    pub org: Organization,
    pub partner: Partner,
    pub super_admin: User,
    pub org_admin: User,
    pub user: User,
}

impl TestContext {
    pub async fn seeded() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let demo = seed_demo(store.as_ref()).await.unwrap();

        Self {
            store,
            security: SecurityConfig {
                jwt_secret: "test-secret".to_string(),
                jwt_expiry_hours: 1,
                session_cookie: "admin_session".to_string(),
                secure_cookies: false,
            },
            org: demo.org,
            partner: demo.partner,
            super_admin: demo.super_admin,
            org_admin: demo.org_admin,
            user: demo.user,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.store.clone(), self.security.clone()).unwrap()
    }

    pub async fn serve(&self) -> TestServer {
        self.serve_with(|state| state).await
    }

    /// Serve the app with a customized state, e.g. mocked role collaborators.
    pub async fn serve_with(&self, customize: impl FnOnce(AppState) -> AppState) -> TestServer {
        let router = app(customize(self.state()));
        let port = portpicker::pick_unused_port().expect("free port");
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer {
            base_url: format!("http://127.0.0.1:{}", port),
            client: Client::builder().redirect(redirect::Policy::none()).build().unwrap(),
            security: self.security.clone(),
        }
    }

    /// The flash a response leaves behind, empty when it sets none.
    pub fn flash_of(res: &reqwest::Response) -> Flash {
        res.headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|cookie| cookie.strip_prefix(FLASH_COOKIE)?.strip_prefix('='))
            .map(|rest| Flash::decode(rest.split(';').next().unwrap_or_default()))
            .last()
            .unwrap_or_default()
    }
}

/// A running app plus a client that never follows redirects.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    security: SecurityConfig,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn signed_in(&self, builder: RequestBuilder, user: &User) -> RequestBuilder {
        let token = session_token(user.id, &user.email, &self.security).unwrap();
        builder.bearer_auth(token)
    }

    pub fn get_as(&self, user: &User, path: &str) -> RequestBuilder {
        self.signed_in(self.client.get(self.url(path)), user)
    }

    pub fn post_as(&self, user: &User, path: &str) -> RequestBuilder {
        self.signed_in(self.client.post(self.url(path)), user)
    }

    pub fn delete_as(&self, user: &User, path: &str) -> RequestBuilder {
        self.signed_in(self.client.delete(self.url(path)), user)
    }
}
