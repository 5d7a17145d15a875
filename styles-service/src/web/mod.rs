//! HTTP surface for examples and element styles
//!
//! Routes:
//! - `GET /examples` - every row of the example table
//! - `GET /element/:id/styles` - one element's margins and paddings
//! - `PUT /element/:id/styles` - overwrite one element's margins and paddings
//! - `GET /health` - database round trip

pub mod api;
pub mod state;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::db::{Database, ReadinessPolicy};
use state::AppState;

/// Connect to the database, then serve until a shutdown signal arrives.
///
/// The HTTP port is only bound after the database connection is up. The
/// database is closed once on the way out, whether serving ended cleanly or not.
pub async fn run(config: ServiceConfig) -> Result<()> {
    let policy = ReadinessPolicy::from(&config.readiness);
    let db = Database::connect(&config.database, &policy).await?;

    let state = AppState::new(Arc::new(db.clone()));
    let addr = SocketAddr::new(config.server.bind, config.server.port);

    let result = async {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(
            "Styles service is running at http://localhost:{}/",
            config.server.port
        );
        serve(listener, state, shutdown_signal()).await
    }
    .await;

    db.close().await;
    result
}

/// Serve the router on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/examples", get(api::list_examples))
        .route(
            "/element/:id/styles",
            get(api::get_element_styles).put(api::update_element_styles),
        )
        .route("/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Resolves on Ctrl-C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
