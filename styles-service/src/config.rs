//! Configuration loading
//!
//! Settings resolve with priority: CLI flag / environment > config file > defaults.
//! The config file is optional TOML; every section and key may be omitted.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

/// Top-level service configuration (from styles.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

/// HTTP listener section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
}

fn default_server_port() -> u16 {
    3000
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_bind(),
        }
    }
}

/// Database endpoint section
///
/// Credentials and database name are not configured here; they come from the
/// libpq environment variables (`PGUSER`, `PGPASSWORD`, `PGDATABASE`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a free pooled connection before a query fails
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// `host:port` as used for the readiness check and in log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Readiness wait section (backoff before the first connection)
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Give up once this much time has passed since the first attempt
    #[serde(default = "default_max_elapsed")]
    pub max_elapsed_secs: u64,
    /// Upper bound on a single TCP connect attempt
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_ms: u64,
}

fn default_initial_delay() -> u64 {
    250
}

fn default_max_delay() -> u64 {
    5_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_max_elapsed() -> u64 {
    60
}

fn default_attempt_timeout() -> u64 {
    1_000
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_elapsed_secs: default_max_elapsed(),
            attempt_timeout_ms: default_attempt_timeout(),
        }
    }
}

/// Values supplied on the command line or through the environment.
///
/// `None` means "not given", so the config file or default applies.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server_port: Option<u16>,
    pub bind: Option<IpAddr>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub wait_timeout_secs: Option<u64>,
}

impl ServiceConfig {
    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the optional config file, then apply CLI/env overrides on top
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let base = match path {
            Some(path) => {
                tracing::debug!("Loading config from: {}", path.display());
                Self::load_from_path(path)?
            }
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides))
    }

    /// Apply overrides that were actually given
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(host) = overrides.db_host {
            self.database.host = host;
        }
        if let Some(port) = overrides.db_port {
            self.database.port = port;
        }
        if let Some(secs) = overrides.wait_timeout_secs {
            self.readiness.max_elapsed_secs = secs;
        }
        self
    }
}
