//! Like Follow App Server - HTTP API server binary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use likefollow_app_server::{LoggingConfig, ServerConfig, run_with_shutdown};

/// Like Follow API Server
#[derive(Parser)]
#[command(name = "likefollow-server")]
#[command(about = "HTTP API server for Like Follow content generation")]
#[command(version)]
struct Args {
    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address
    #[arg(short, long)]
    listen: Option<String>,

    /// Log level (overrides the configured level)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable JSON logging (overrides the configured format)
    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Load `.env` from the working directory. A missing file is fine.
///
/// Runs before the subscriber exists, so the outcome is reported afterwards
/// by [`report_dotenv`].
fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn report_dotenv(outcome: &Result<Option<PathBuf>, dotenvy::Error>) {
    match outcome {
        Ok(Some(path)) => info!("Loaded environment variables from {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}

async fn shutdown_signal(shutdown_timeout: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown (timeout: {}s)...", shutdown_timeout);
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown (timeout: {}s)...", shutdown_timeout);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // `.env` must be in the environment before config and the log filter read it.
    let dotenv = load_dotenv();

    let loaded = match &args.config {
        Some(config_path) => ServerConfig::load(config_path)
            .map_err(|e| format!("Failed to load config from {config_path}: {e:#}")),
        None => ServerConfig::from_env()
            .map_err(|e| format!("Failed to load config from environment: {e:#}")),
    };

    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default()
        .with_overrides(args.log_level, args.json_logs);
    setup_logging(&logging);
    report_dotenv(&dotenv);

    let mut config = match loaded {
        Ok(c) => c,
        Err(message) => {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    info!("Starting Like Follow server on {}", config.listen_addr);
    info!("Press Ctrl+C to stop");

    let shutdown = shutdown_signal(config.shutdown_timeout);

    if let Err(e) = run_with_shutdown(config, shutdown).await {
        error!("Server error: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}
