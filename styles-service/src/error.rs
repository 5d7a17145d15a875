//! Error types shared by the connector and the store

use std::time::Duration;

use thiserror::Error;

/// Startup failures while bringing up the database connection.
///
/// Both variants are fatal: the service must not serve traffic without a
/// database behind it.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("database at {address} not reachable after {attempts} attempts ({elapsed:?})")]
    Unreachable {
        address: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("failed to connect to database at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: sqlx::Error,
    },
}

/// A query against the style tables failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}
