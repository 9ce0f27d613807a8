//! # Aftercare Backend API
//!
//! Stateless REST service serving post-operative brochure content and
//! accepting patient tracker submissions. Persistence (SQLite) and the
//! response cache (Redis) are soft dependencies: the service runs with
//! either, both, or neither.

pub mod api;
pub mod cache;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod rate_limit;

pub use config::ApiConfig;
pub use error::{Error, Result};

use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use cache::ResponseCache;
use content::ContentStore;
use db::TrackerStore;
use rate_limit::IpRateLimiter;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentStore>,
    pub store: TrackerStore,
    pub cache: ResponseCache,
    pub limiter: Arc<IpRateLimiter>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        content: ContentStore,
        store: TrackerStore,
        cache: ResponseCache,
    ) -> Result<Self> {
        let limiter = IpRateLimiter::new(
            config.rate_limit_max,
            Duration::from_secs(config.rate_limit_window_secs),
        )?;
        Ok(Self {
            content: Arc::new(content),
            store,
            cache,
            limiter: Arc::new(limiter),
            config: Arc::new(config),
        })
    }
}

/// Build the service router with all routes and middleware layers
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/brochures", get(api::brochures::list_brochures))
        .route("/brochures/:id", get(api::brochures::get_brochure))
        .route("/trackers", post(api::trackers::create_tracker))
        .route("/trackers/:patient_id", get(api::trackers::list_trackers))
        .fallback(api::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
