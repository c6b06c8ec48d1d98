pub mod monitor;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;
use crate::runtime::{Capability, DeferredModule, RuntimeEnv};

pub use monitor::HealthMonitor;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Banco de dados não configurado (defina {0})")]
    Unconfigured(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-scoped connection pool with init-on-first-use semantics.
///
/// One instance is created per process (in the production wiring) and shared
/// across all delegates; the pool itself is created on the first query, not
/// at startup. Construction takes a [`RuntimeEnv`] so the unconfigured path
/// is reachable from tests without touching process environment variables.
pub struct Database {
    env: RuntimeEnv,
    pool: DeferredModule<PgPool>,
}

impl Database {
    pub fn new(env: RuntimeEnv) -> Self {
        Self {
            env,
            pool: DeferredModule::new(),
        }
    }

    /// Get the pool, creating it on first use.
    ///
    /// Without the database capability this fails with an explicit
    /// [`DbError::Unconfigured`] instead of deferring the failure to a
    /// connection attempt.
    pub async fn pool(&self) -> Result<PgPool, DbError> {
        let settings = &config::config().database;
        self.pool
            .load_if(
                self.env.has(Capability::Database),
                || DbError::Unconfigured("DATABASE_URL"),
                || async {
                    let url = std::env::var("DATABASE_URL")
                        .map_err(|_| DbError::Unconfigured("DATABASE_URL"))?;
                    let pool = PgPoolOptions::new()
                        .max_connections(settings.max_connections)
                        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
                        .connect(&url)
                        .await?;
                    info!("Created database pool");
                    Ok(pool)
                },
            )
            .await
            .cloned()
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DbError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}
