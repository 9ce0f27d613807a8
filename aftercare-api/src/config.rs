//! Configuration for aftercare-api
//!
//! Resolved once in `main` (environment first, optional TOML file
//! fallback) and passed down as an explicit value. No ambient globals.

use crate::error::{Error, Result};
use aftercare_common::config::{env_list, env_parse, env_string, load_toml_table, toml_string, toml_u64};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind address (matches the historical deployment port)
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default response-cache TTL in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default per-IP rate limit: 100 requests per 60 second window
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Backend service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// SQLite database path; `None` disables persistence (echo-only mode)
    pub database_url: Option<String>,
    /// Redis connection URL; `None` disables the response cache
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    /// CORS allow-list; defaults to the local UI origin
    pub cors_origins: Vec<String>,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.parse().expect("default bind addr parses"),
            database_url: None,
            redis_url: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cors_origins: vec!["http://localhost:5174".to_string()],
            rate_limit_max: DEFAULT_RATE_LIMIT_MAX,
            rate_limit_window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
        }
    }
}

impl ApiConfig {
    /// Resolve configuration: environment variables override the TOML
    /// file, the TOML file overrides compiled defaults.
    ///
    /// The config file path comes from `config_file` (CLI flag) or the
    /// `AFTERCARE_API_CONFIG` variable; a missing file is fine.
    pub fn resolve(config_file: Option<PathBuf>) -> Result<Self> {
        let path = config_file.or_else(|| env_string("AFTERCARE_API_CONFIG").map(PathBuf::from));
        let table = match path {
            Some(path) => load_toml_table(&path).map_err(Error::from)?,
            None => None,
        };
        let table = table.as_ref();
        let defaults = ApiConfig::default();

        let bind_addr = env_string("AFTERCARE_API_BIND")
            .or_else(|| toml_string(table, "bind_addr"))
            .map(|raw| {
                raw.parse::<SocketAddr>()
                    .map_err(|e| Error::Config(format!("invalid bind address {raw}: {e}")))
            })
            .transpose()?
            .unwrap_or(defaults.bind_addr);

        let database_url =
            env_string("AFTERCARE_DATABASE_URL").or_else(|| toml_string(table, "database_url"));

        let redis_url =
            env_string("AFTERCARE_REDIS_URL").or_else(|| toml_string(table, "redis_url"));

        let cache_ttl_secs = env_parse::<u64>("AFTERCARE_CACHE_TTL_SECS")
            .map_err(Error::from)?
            .or_else(|| toml_u64(table, "cache_ttl_secs"))
            .unwrap_or(defaults.cache_ttl_secs);

        let mut cors_origins = env_list("AFTERCARE_CORS_ORIGINS");
        if cors_origins.is_empty() {
            cors_origins = defaults.cors_origins.clone();
        }

        let rate_limit_max = env_parse::<u32>("AFTERCARE_RATE_LIMIT_MAX")
            .map_err(Error::from)?
            .or_else(|| toml_u64(table, "rate_limit_max").map(|v| v as u32))
            .unwrap_or(defaults.rate_limit_max);

        let rate_limit_window_secs = env_parse::<u64>("AFTERCARE_RATE_LIMIT_WINDOW_SECS")
            .map_err(Error::from)?
            .or_else(|| toml_u64(table, "rate_limit_window_secs"))
            .unwrap_or(defaults.rate_limit_window_secs);

        if rate_limit_max == 0 {
            return Err(Error::Config(
                "rate_limit_max must be at least 1".to_string(),
            ));
        }
        if rate_limit_window_secs == 0 {
            return Err(Error::Config(
                "rate_limit_window_secs must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            database_url,
            redis_url,
            cache_ttl_secs,
            cors_origins,
            rate_limit_max,
            rate_limit_window_secs,
        })
    }
}
