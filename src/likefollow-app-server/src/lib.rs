//! Like Follow App Server - HTTP API for social media content generation.
//!
//! This crate provides:
//! - `POST /api/generate-content`, backed by likefollow-engine's resolver
//! - Service info, status and health endpoints
//! - Reference table endpoints for platforms, tones and models
//! - Request id, timing, body limit, content type and timeout middleware
//! - CORS configured from an origin allow-list

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{LoggingConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Run the server with the given configuration.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    run_with_shutdown(config, std::future::pending()).await
}

/// Run the server with graceful shutdown support.
pub async fn run_with_shutdown<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::new(config.clone())?);
    let app = create_router_with_state(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Starting Like Follow server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    create_router_with_state(Arc::new(state))
}

/// Create the application router with an Arc-wrapped state.
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    use axum::middleware::{from_fn, from_fn_with_state};

    let cors = middleware::cors_layer(&state.config.cors_origins);

    api::routes()
        .layer(from_fn(middleware::content_type_middleware))
        .layer(from_fn_with_state(
            Arc::clone(&state),
            middleware::body_limit_middleware,
        ))
        .layer(from_fn_with_state(
            Arc::clone(&state),
            middleware::timeout_middleware,
        ))
        .layer(from_fn(middleware::timing_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
