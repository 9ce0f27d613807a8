//! Configuration for aftercare-ui

use crate::error::{Error, Result};
use aftercare_common::config::{env_parse, env_string, load_toml_table, toml_string, toml_u64};
use aftercare_common::model::DEFAULT_PROCEDURE_TYPE;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind address for the patient UI
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5174";

/// Default backend API base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default sync request timeout (explicit rather than transport default)
pub const DEFAULT_SYNC_TIMEOUT_SECS: u64 = 10;

/// Default connectivity probe interval
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;

/// Patient UI service configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub bind_addr: SocketAddr,
    pub api_base_url: String,
    /// Directory holding the local tracker store
    pub data_dir: PathBuf,
    /// Patient identity used for sync submissions
    pub patient_id: String,
    /// Procedure whose brochure the UI shows
    pub procedure: String,
    pub sync_timeout_secs: u64,
    pub probe_interval_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.parse().expect("default bind addr parses"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: PathBuf::from("aftercare-data"),
            patient_id: "local-patient".to_string(),
            procedure: DEFAULT_PROCEDURE_TYPE.to_string(),
            sync_timeout_secs: DEFAULT_SYNC_TIMEOUT_SECS,
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
        }
    }
}

impl UiConfig {
    /// Resolve configuration: environment first, TOML file second,
    /// compiled defaults last.
    pub fn resolve(config_file: Option<PathBuf>) -> Result<Self> {
        let path = config_file.or_else(|| env_string("AFTERCARE_UI_CONFIG").map(PathBuf::from));
        let table = match path {
            Some(path) => load_toml_table(&path).map_err(Error::from)?,
            None => None,
        };
        let table = table.as_ref();
        let defaults = UiConfig::default();

        let bind_addr = env_string("AFTERCARE_UI_BIND")
            .or_else(|| toml_string(table, "bind_addr"))
            .map(|raw| {
                raw.parse::<SocketAddr>()
                    .map_err(|e| Error::Config(format!("invalid bind address {raw}: {e}")))
            })
            .transpose()?
            .unwrap_or(defaults.bind_addr);

        let api_base_url = env_string("AFTERCARE_API_URL")
            .or_else(|| toml_string(table, "api_base_url"))
            .unwrap_or(defaults.api_base_url);

        let data_dir = env_string("AFTERCARE_DATA_DIR")
            .or_else(|| toml_string(table, "data_dir"))
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let patient_id = env_string("AFTERCARE_PATIENT_ID")
            .or_else(|| toml_string(table, "patient_id"))
            .unwrap_or(defaults.patient_id);

        let procedure = env_string("AFTERCARE_PROCEDURE")
            .or_else(|| toml_string(table, "procedure"))
            .unwrap_or(defaults.procedure);

        let sync_timeout_secs = env_parse::<u64>("AFTERCARE_SYNC_TIMEOUT_SECS")
            .map_err(Error::from)?
            .or_else(|| toml_u64(table, "sync_timeout_secs"))
            .unwrap_or(defaults.sync_timeout_secs);

        let probe_interval_secs = env_parse::<u64>("AFTERCARE_PROBE_INTERVAL_SECS")
            .map_err(Error::from)?
            .or_else(|| toml_u64(table, "probe_interval_secs"))
            .unwrap_or(defaults.probe_interval_secs);

        if sync_timeout_secs == 0 {
            return Err(Error::Config(
                "sync_timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            api_base_url,
            data_dir,
            patient_id,
            procedure,
            sync_timeout_secs,
            probe_interval_secs,
        })
    }
}
