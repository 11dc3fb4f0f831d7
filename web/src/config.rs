use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://geezers.db";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "geezer-pubs/0.1 (local map of London pubs)";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },
    #[error("{key} must be a positive whole number of seconds, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Comma separated ISO country codes; empty means worldwide.
    pub country_codes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub geofence_enabled: bool,
    pub geocoder: GeocoderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let geofence_enabled = match get("GEOFENCE_ENABLED") {
            None => true,
            Some(raw) => parse_bool("GEOFENCE_ENABLED", &raw)?,
        };

        let timeout_secs = match get("GEOCODER_TIMEOUT_SECS") {
            None => 10,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    key: "GEOCODER_TIMEOUT_SECS",
                    value: raw.clone(),
                })?,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            geofence_enabled,
            geocoder: GeocoderConfig {
                base_url: get("GEOCODER_URL")
                    .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                user_agent: get("GEOCODER_USER_AGENT")
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                timeout: Duration::from_secs(timeout_secs),
                country_codes: lookup("GEOCODER_COUNTRY_CODES").unwrap_or_else(|| "gb".to_string()),
            },
        })
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}
