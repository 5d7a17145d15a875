use anyhow::Result;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

use styles_service::config::{ConfigOverrides, ServiceConfig};
use styles_service::{telemetry, web};

#[derive(Parser)]
#[command(name = "styles-service")]
#[command(about = "Serve element margin and padding styles from Postgres")]
struct Cli {
    /// Port the HTTP listener binds to
    #[arg(long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Address the HTTP listener binds to
    #[arg(long, env = "STYLES_BIND")]
    bind: Option<IpAddr>,

    /// Database host
    #[arg(long = "db-host", env = "PGHOST")]
    db_host: Option<String>,

    /// Database port
    #[arg(long = "db-port", env = "PGPORT")]
    db_port: Option<u16>,

    /// Seconds to wait for the database to accept connections
    #[arg(long = "wait-timeout", env = "STYLES_WAIT_TIMEOUT")]
    wait_timeout: Option<u64>,

    /// Optional TOML config file
    #[arg(long, short, env = "STYLES_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();
    telemetry::init_tracing()?;

    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        server_port: cli.port,
        bind: cli.bind,
        db_host: cli.db_host,
        db_port: cli.db_port,
        wait_timeout_secs: cli.wait_timeout,
    };
    let config = ServiceConfig::resolve(cli.config.as_deref(), overrides)?;

    tracing::info!("Connecting");
    web::run(config).await
}
