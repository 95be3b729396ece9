use clap::Args;
use std::sync::Arc;

use crate::app::app;
use crate::auth::session_token;
use crate::config::{config, AppConfig};
use crate::database::models::UserAttrs;
use crate::database::{seed_demo, DatabaseManager, Store};
use crate::services::AddRoleService;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Override the listen port")]
    pub port: Option<u16>,

    #[arg(
        long,
        value_name = "EMAIL",
        help = "Ensure a super admin with this email exists and log a session token for it"
    )]
    pub bootstrap_admin: Option<String>,

    #[arg(long, help = "Fill an empty store with demo organizations, partners and users")]
    pub seed_demo: bool,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config();
    check_startup(config)?;
    tracing::info!("Starting admin-users in {:?} mode", config.environment);

    let store = DatabaseManager::open(&config.database).await?;
    if args.seed_demo {
        seed_demo(store.as_ref()).await?;
    }
    if let Some(email) = args.bootstrap_admin.as_deref() {
        bootstrap_admin(store.clone(), email, config).await?;
    }

    let state = AppState::new(store, config.security.clone())?;
    let router = app(state);

    let bind_addr = match args.port {
        Some(port) => format!("{}:{}", config.server.host, port),
        None => config.bind_addr(),
    };
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("admin-users listening on http://{}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}

/// Refuse configurations that cannot work outside development.
fn check_startup(config: &AppConfig) -> anyhow::Result<()> {
    if crate::is_production!() && config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL is required in production");
    }
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET is required in {:?}", config.environment);
    }
    Ok(())
}

async fn bootstrap_admin(store: Arc<dyn Store>, email: &str, config: &AppConfig) -> anyhow::Result<()> {
    let email = email.trim().to_lowercase();
    let user = match store.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            store
                .create_user(&UserAttrs {
                    name: "Administrator".to_string(),
                    email: email.clone(),
                    organization_id: None,
                })
                .await?
        }
    };

    AddRoleService::new(store)
        .add_role(&user.id.to_string(), "super_admin", "")
        .await?;

    let token = session_token(user.id, &user.email, &config.security)?;
    tracing::info!("Super admin {} <{}> ready, session token: {}", user.id, user.email, token);
    Ok(())
}
