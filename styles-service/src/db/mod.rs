//! Database connector
//!
//! Waits for the Postgres endpoint to accept TCP connections, then opens a
//! connection pool. The pool is shared by every request handler and closed
//! once when the process shuts down.

pub mod examples;
pub mod readiness;
pub mod styles;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::error::{ConnectError, StoreError};
use crate::store::{BoxStyles, StyleStore};
pub use readiness::{wait_for_tcp, ReadinessPolicy};

/// Handle to the Postgres pool, cheap to clone
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    closed: Arc<AtomicBool>,
}

impl Database {
    /// Wait for the database endpoint, then connect.
    ///
    /// Host and port come from `config`; user, password, database name and
    /// SSL mode are read from the libpq environment (`PGUSER`, `PGPASSWORD`,
    /// `PGDATABASE`, `PGSSLMODE`, ...).
    pub async fn connect(
        config: &DatabaseConfig,
        readiness: &ReadinessPolicy,
    ) -> Result<Self, ConnectError> {
        let address = config.address();
        tracing::info!("Waiting for tcp:{}", address);
        let attempts = wait_for_tcp(&address, readiness).await?;
        tracing::debug!(attempts, "Database endpoint reachable");

        tracing::info!("Initializing client");
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port);

        // connect_with opens the first connection eagerly, so bad credentials fail here
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|source| ConnectError::Connect {
                address: address.clone(),
                source,
            })?;

        tracing::info!("Connected to database at {}", address);
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Underlying sqlx pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection.
    ///
    /// Only the first call does anything; it returns `true`. Clones share the
    /// flag, so closing through any clone counts.
    pub async fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Database already closed");
            return false;
        }

        tracing::info!("Closing database connections");
        self.pool.close().await;
        true
    }
}

#[async_trait]
impl StyleStore for Database {
    async fn list_examples(&self) -> Result<Vec<Value>, StoreError> {
        Database::list_examples(self).await
    }

    async fn get_element_styles(&self, element_id: &str) -> Result<Option<Value>, StoreError> {
        Database::get_element_styles(self, element_id).await
    }

    async fn update_element_styles(
        &self,
        element_id: &str,
        styles: &BoxStyles,
    ) -> Result<Option<Value>, StoreError> {
        Database::update_element_styles(self, element_id, styles).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
