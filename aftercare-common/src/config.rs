//! Configuration resolution helpers
//!
//! Both services resolve their settings environment-first with an
//! optional TOML file fallback, then build an explicit config struct in
//! `main` and pass it down. Nothing in this module holds global state.

use crate::{Error, Result};
use std::path::Path;
use std::str::FromStr;

/// Read an environment variable, treating unset and blank as absent
pub fn env_string(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

/// Read and parse an environment variable
///
/// Unset or blank yields `Ok(None)`; a present-but-unparsable value is a
/// configuration error rather than a silent fallback.
pub fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid value for {key}: {e}"))),
        None => Ok(None),
    }
}

/// Parse a comma-separated environment variable into a list
pub fn env_list(key: &str) -> Vec<String> {
    env_string(key)
        .map(|raw| {
            raw.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Load a TOML config file into a generic table
///
/// A missing file is not an error (services run zero-config); a file
/// that exists but does not parse is.
pub fn load_toml_table(path: &Path) -> Result<Option<toml::Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let table = content
        .parse::<toml::Table>()
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;
    Ok(Some(table))
}

/// Look up a string key in an optional TOML table
pub fn toml_string(table: Option<&toml::Table>, key: &str) -> Option<String> {
    table
        .and_then(|t| t.get(key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Look up an integer key in an optional TOML table
pub fn toml_u64(table: Option<&toml::Table>, key: &str) -> Option<u64> {
    table
        .and_then(|t| t.get(key))
        .and_then(|v| v.as_integer())
        .and_then(|v| u64::try_from(v).ok())
}
