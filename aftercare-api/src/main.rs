//! aftercare-api - Backend REST service
//!
//! Serves brochure content and accepts patient tracker submissions.
//! Runs zero-config: without a database it echoes tracker records,
//! without Redis it serves uncached.

use aftercare_api::cache::ResponseCache;
use aftercare_api::content::ContentStore;
use aftercare_api::db::TrackerStore;
use aftercare_api::{build_router, ApiConfig, AppState};
use aftercare_common::backoff::BackoffPolicy;
use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "aftercare-api", about = "Aftercare backend REST API")]
struct Args {
    /// Path to a TOML config file (overrides AFTERCARE_API_CONFIG)
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
        "Starting Aftercare Backend API (aftercare-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let mut config = ApiConfig::resolve(args.config)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let content = ContentStore::with_builtin();
    info!("Loaded {} brochure(s)", content.len());

    let store = match &config.database_url {
        Some(url) => TrackerStore::connect(url).await?,
        None => {
            warn!("No database configured; tracker records will not be persisted");
            TrackerStore::disabled()
        }
    };

    let cache = ResponseCache::connect(
        config.redis_url.as_deref(),
        config.cache_ttl_secs,
        BackoffPolicy::default(),
    )
    .await;
    if !cache.is_enabled() && config.redis_url.is_some() {
        warn!("Redis configured but unreachable; running without cache");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(config, content, store, cache)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("aftercare-api listening on http://{bind_addr}");
    info!("Health check: http://{bind_addr}/health");
    info!("Brochures: http://{bind_addr}/brochures");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
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
