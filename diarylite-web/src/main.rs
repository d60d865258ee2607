//! diarylite-web - personal journaling service
//!
//! Resolves bootstrap configuration, opens the database, and serves the
//! JSON API until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use diarylite_common::config::{
    load_toml_config, ConfigSource, RootFolderInitializer, ServiceConfig,
};
use diarylite_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for diarylite-web
#[derive(Parser, Debug)]
#[command(name = "diarylite-web")]
#[command(about = "Personal journaling web service")]
#[command(version)]
struct Args {
    /// Folder holding diarylite.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "DIARYLITE_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long)]
    bind: Option<String>,

    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so the file can set the level.
    // Its outcome is logged once the subscriber is installed.
    let (toml_config, config_source) = load_toml_config(args.config.as_deref());
    let config = ServiceConfig::resolve(args.root_folder, args.port, args.bind, &toml_config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("diarylite_web={0},diarylite_common={0},tower_http=info", config.log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting DiaryLite (diarylite-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_source {
        ConfigSource::File(path) => info!("Loaded config file: {}", path.display()),
        ConfigSource::Defaults => info!("No config file found, using built-in defaults"),
        ConfigSource::Fallback(e) => warn!("{}; using built-in defaults", e),
    }

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = diarylite_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let app = build_router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind((config.bind_address.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.bind_address, config.port))?;
    let addr = listener.local_addr()?;
    info!("diarylite-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
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
