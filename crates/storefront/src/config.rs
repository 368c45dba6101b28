//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `NEEDLEDROP_API_HOST` - Catalog/order API origin (default: http://167.172.35.211)
//! - `NEEDLEDROP_DATA_DIR` - Directory holding the persisted cart (default: .needledrop)
//! - `NEEDLEDROP_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `NEEDLEDROP_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_HOST: &str = "http://167.172.35.211";
const DEFAULT_DATA_DIR: &str = ".needledrop";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

const RECORDS_PATH: &str = "api/v1/records/";
const ORDERS_PATH: &str = "api/v1/orders/";
const STYLES_PATH: &str = "api/v1/styles/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin of the catalog and order API
    pub api_host: Url,
    /// Directory for the persisted cart
    pub data_dir: PathBuf,
    /// Timeout applied to every HTTP request
    pub http_timeout: Duration,
    /// How long catalog responses stay cached
    pub cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_host = parse_api_host(
            "NEEDLEDROP_API_HOST",
            &get_env_or_default("NEEDLEDROP_API_HOST", DEFAULT_API_HOST),
        )?;
        let data_dir = PathBuf::from(get_env_or_default("NEEDLEDROP_DATA_DIR", DEFAULT_DATA_DIR));
        let http_timeout = get_duration_secs("NEEDLEDROP_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let cache_ttl = get_duration_secs("NEEDLEDROP_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            api_host,
            data_dir,
            http_timeout,
            cache_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Defaults pointed at a specific API origin, without reading the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_host` is not an http(s) URL.
    pub fn for_api_host(api_host: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_host: parse_api_host("api_host", api_host)?,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    /// Records listing endpoint (`{host}/api/v1/records/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined onto the host.
    pub fn records_url(&self) -> Result<Url, url::ParseError> {
        self.api_host.join(RECORDS_PATH)
    }

    /// Order submission endpoint (`{host}/api/v1/orders/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined onto the host.
    pub fn orders_url(&self) -> Result<Url, url::ParseError> {
        self.api_host.join(ORDERS_PATH)
    }

    /// Styles endpoint (`{host}/api/v1/styles/`), the source of the category
    /// list.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined onto the host.
    pub fn styles_url(&self) -> Result<Url, url::ParseError> {
        self.api_host.join(STYLES_PATH)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a whole number of seconds as a `Duration`. Zero is rejected.
fn get_duration_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(Duration::from_secs(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

/// Parse an API origin. A trailing slash is added so endpoint paths join
/// underneath any path prefix instead of replacing its last segment.
fn parse_api_host(key: &str, value: &str) -> Result<Url, ConfigError> {
    let value = value.trim();
    let normalized = if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    };

    let url = Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    Ok(url)
}
