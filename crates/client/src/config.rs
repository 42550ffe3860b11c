//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RECICLA_API_URL` - Backend base URL (e.g., `https://api.reciclacontigo.pe`)
//!
//! ## Optional
//! - `RECICLA_DATA_DIR` - Local storage directory (default: platform data dir)
//! - `RECICLA_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: none)
//! - `RECICLA_GEOCODER_URL` - Reverse geocoder base URL
//!   (default: `https://nominatim.openstreetmap.org`)
//! - `RECICLA_GEOCODER_DISABLED` - `true` to skip reverse geocoding
//! - `RECICLA_LOCALITY` - Locality appended to addresses (default: Ventanilla)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_LOCALITY: &str = "Ventanilla";
const DATA_DIR_NAME: &str = "recicla-contigo";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: Url,
    /// Directory holding the key-value store
    pub data_dir: PathBuf,
    /// Request timeout; `None` leaves detection to the transport
    pub http_timeout: Option<Duration>,
    /// Reverse geocoder base URL; `None` disables geocoding
    pub geocoder_url: Option<Url>,
    /// Locality suffix for formatted addresses
    pub locality: String,
}

impl ClientConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value cannot
    /// be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("RECICLA_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("RECICLA_API_URL".to_owned()))?;
        let api_url = parse_http_url("RECICLA_API_URL", &api_url)?;

        let data_dir = get("RECICLA_DATA_DIR").map_or_else(default_data_dir, PathBuf::from);

        let http_timeout = get("RECICLA_HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        ConfigError::InvalidEnvVar(
                            "RECICLA_HTTP_TIMEOUT_SECS".to_owned(),
                            format!("expected a positive number of seconds, got {raw}"),
                        )
                    })
            })
            .transpose()?;

        let geocoder_disabled = get("RECICLA_GEOCODER_DISABLED")
            .map(|raw| parse_bool("RECICLA_GEOCODER_DISABLED", &raw))
            .transpose()?
            .unwrap_or(false);
        let geocoder_url = if geocoder_disabled {
            None
        } else {
            let raw =
                get("RECICLA_GEOCODER_URL").unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_owned());
            Some(parse_http_url("RECICLA_GEOCODER_URL", &raw)?)
        };

        let locality = get("RECICLA_LOCALITY").unwrap_or_else(|| DEFAULT_LOCALITY.to_owned());

        Ok(Self {
            api_url,
            data_dir,
            http_timeout,
            geocoder_url,
            locality,
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

fn parse_http_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            name.to_owned(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            name.to_owned(),
            format!("expected a boolean, got {other}"),
        )),
    }
}
