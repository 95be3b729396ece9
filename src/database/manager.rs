use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::store::{Store, StoreError};
use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Builds the store backend named by configuration
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect to Postgres when a URL is configured, otherwise fall back to
    /// the in-memory store.
    pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        let Some(url) = config.url.as_deref() else {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            return Ok(Arc::new(MemoryStore::new()));
        };

        let pool = Self::connect(url, config).await?;
        if config.run_migrations {
            Self::migrate(&pool).await?;
        }
        Ok(Arc::new(PgStore::new(pool)))
    }

    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(StoreError::from)?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Connect and migrate without serving, for the `migrate` command.
    pub async fn migrate_only(config: &DatabaseConfig) -> Result<(), DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let pool = Self::connect(url, config).await?;
        Self::migrate(&pool).await
    }
}
