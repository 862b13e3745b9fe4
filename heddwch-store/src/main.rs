//! heddwch-store - central state store for the quiz pages
//!
//! Serves the update endpoint and the SSE broadcast stream, and runs the
//! dispatch engine that owns the application state.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use heddwch_common::config::{self, DataSourceConfig, TomlConfig};
use heddwch_common::events::{Channels, InternalMessage, Update};
use heddwch_store::debug_log::SqliteDebugLogStore;
use heddwch_store::engine::{DispatchEngine, EngineSettings};
use heddwch_store::{build_router, feed, AppContext};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "heddwch_store=debug,heddwch_common=info,tower_http=info";

/// Command-line arguments for heddwch-store
#[derive(Parser, Debug)]
#[command(name = "heddwch-store")]
#[command(about = "Central state store for the heddwch quiz pages")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HEDDWCH_PORT")]
    port: Option<u16>,

    /// Path to the TOML config file
    #[arg(short, long, env = "HEDDWCH_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database (HEDDWCH_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Base URL of the claim datasets
    #[arg(long, env = "HEDDWCH_DATA_URL", conflicts_with = "data_dir")]
    data_url: Option<String>,

    /// Local directory holding the claim datasets
    #[arg(long, env = "HEDDWCH_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG wins; otherwise the config file level is applied once loaded
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting heddwch-store v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let config_path = config::find_config_file(args.config.as_deref());
    let toml_config = TomlConfig::load_or_default(config_path.as_deref());
    if config_path.is_some() && !from_env {
        let level = &toml_config.logging.level;
        let directives = format!(
            "heddwch_store={level},heddwch_common={level},tower_http=info"
        );
        match EnvFilter::try_new(&directives) {
            Ok(new_filter) => {
                if let Err(e) = filter_handle.modify(|f| *f = new_filter) {
                    warn!("Could not apply log level {}: {}", level, e);
                }
            }
            Err(e) => warn!("Ignoring invalid log level {}: {}", level, e),
        }
    }

    let root_folder =
        config::resolve_root_folder(args.root_folder.as_deref(), "HEDDWCH_ROOT_FOLDER", &toml_config);
    let db_path = config::database_path(&root_folder, &toml_config);
    info!("Database path: {}", db_path.display());

    let db = heddwch_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let data_source = match (args.data_url, args.data_dir) {
        (Some(url), _) => DataSourceConfig::Url(url),
        (None, Some(dir)) => DataSourceConfig::Directory(dir),
        (None, None) => toml_config.data_source.clone(),
    };
    info!("Claim data source: {:?}", data_source);
    let claim_feed = feed::from_config(&data_source);

    let channels = Channels::new(toml_config.bus_capacity);
    let shutdown = CancellationToken::new();

    // Subscribe before spawning so nothing published from here on is missed
    let updates_rx = channels.updates.subscribe();
    let engine = DispatchEngine::new(
        Arc::clone(&claim_feed),
        Arc::new(SqliteDebugLogStore::new(db)),
        channels.broadcasts.clone(),
        EngineSettings::from(&toml_config),
    );
    let engine_task = tokio::spawn(engine.run(updates_rx, shutdown.clone()));
    info!("Dispatch engine started");

    let bootstrap_updates = channels.updates.clone();
    tokio::spawn(async move {
        feed::publish_open_graph(claim_feed.as_ref(), &bootstrap_updates).await;
    });

    channels
        .updates
        .publish_lossy(Update::internal(InternalMessage::ReadyToRender));

    let port = args.port.unwrap_or(toml_config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let app = build_router(AppContext::new(channels));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("heddwch-store listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("Server error")?;

    shutdown.cancel();
    if let Err(e) = engine_task.await {
        warn!("Dispatch engine task failed: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM, or when `shutdown` is cancelled elsewhere
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
        _ = shutdown.cancelled() => {}
    }

    shutdown.cancel();
}
