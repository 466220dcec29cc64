//! gdc-web - Geotechnical Drawing Comparison service
//!
//! Serves a single-page UI for uploading a previous and a current drawing,
//! forwards both to a vision-capable chat-completion model with the
//! comparison rubric, and shows the model's answer with downloads.
//!
//! Startup halts with a configuration error when no API key is configured.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use gdc_common::config::{default_config_path, load_toml_config, LoggingConfig, ServiceConfig};
use gdc_web::services::VisionClient;
use gdc_web::session::spawn_idle_sweeper;
use gdc_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for gdc-web
#[derive(Parser, Debug)]
#[command(name = "gdc-web")]
#[command(about = "Geotechnical drawing comparison service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5730", env = "GDC_PORT")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1", env = "GDC_BIND")]
    bind: IpAddr,

    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long, env = "GDC_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: it carries the log level
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let toml_config = load_toml_config(&config_path).context("Failed to load configuration")?;

    init_tracing(&toml_config.logging)?;

    info!(
        "Starting gdc-web (Drawing Comparison) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if config_path.exists() {
        info!("Config file: {}", config_path.display());
    } else {
        warn!(
            "Config file not found at {}, using compiled defaults",
            config_path.display()
        );
    }

    // Missing API key halts here, before anything is served
    let service_config = match ServiceConfig::resolve(&toml_config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Startup aborted");
        }
    };
    info!(
        model = %service_config.model,
        api_base_url = %service_config.api_base_url,
        prompt_version = %service_config.prompt.version,
        max_upload_bytes = service_config.max_upload_bytes,
        session_ttl_secs = service_config.session_ttl.as_secs(),
        "Comparison service configured"
    );

    let client = VisionClient::new(&service_config).context("Failed to create API client")?;
    let state = AppState::new(Arc::new(client), service_config.max_upload_bytes);
    spawn_idle_sweeper(state.sessions.clone(), service_config.session_ttl);
    let app = build_router(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// RUST_LOG wins over the configured level; optional log file
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
