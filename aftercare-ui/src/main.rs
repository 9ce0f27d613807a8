//! aftercare-ui - Patient-facing tracker service
//!
//! Hosts the tracker state manager, the local file-backed mirror, the
//! backend sync client, and the embedded web UI.

use aftercare_ui::connectivity::{forward_to_manager, spawn_probe};
use aftercare_ui::storage::data_dir_store;
use aftercare_ui::sync::BackendClient;
use aftercare_ui::{build_router, AppState, TrackerManager, UiConfig};
use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "aftercare-ui", about = "Aftercare patient tracker UI")]
struct Args {
    /// Path to a TOML config file (overrides AFTERCARE_UI_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Aftercare Patient UI (aftercare-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let mut config = UiConfig::resolve(args.config)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let store = Arc::new(data_dir_store(&config.data_dir)?);
    info!("Local tracker store: {}", config.data_dir.display());

    let client = BackendClient::new(
        &config.api_base_url,
        Duration::from_secs(config.sync_timeout_secs),
    )?;
    info!("Backend API: {}", client.base_url());

    let manager = Arc::new(TrackerManager::new(store, client.clone()));

    // Connectivity probe feeds online/offline transitions to the manager
    let probe_rx = spawn_probe(
        client.clone(),
        Duration::from_secs(config.probe_interval_secs),
    );
    tokio::spawn(forward_to_manager(probe_rx, manager.clone()));

    let bind_addr = config.bind_addr;
    let state = AppState::new(config, manager, client);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("aftercare-ui listening on http://{bind_addr}");
    info!("Open http://{bind_addr}/ in a browser");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on ctrl-c or SIGTERM so in-flight requests can drain
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
