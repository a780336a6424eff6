//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QUICKCART_API_BASE_URL` - Base URL of the REST backend
//!
//! ## Optional
//! - `QUICKCART_ENV` - `development` (default) or `production`
//! - `QUICKCART_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `QUICKCART_PAYMENT_TIMEOUT_SECS` - Payment initialization timeout
//!   (default: 15; shorter than the general timeout so a hung payment
//!   provider surfaces as a distinct, retryable failure)
//! - `QUICKCART_MAX_UPLOAD_BYTES` - Review image upload cap (default: 5 MiB)
//! - `QUICKCART_ALLOWED_IMAGE_TYPES` - Comma-separated MIME types
//!   (default: image/jpeg,image/png,image/webp)
//! - `QUICKCART_DEFAULT_PAGE_SIZE` - Listing page size (default: 12)
//! - `QUICKCART_MAX_PAGE_SIZE` - Listing page size ceiling (default: 50)
//! - `QUICKCART_STORAGE_DIR` - Directory for durable local state
//!   (cart snapshot, recently viewed); unset disables file persistence

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Deployment environment.
///
/// Drives the cache trade-off: production favors fewer calls against a
/// possibly rate-limited backend; development favors fresh data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development: short staleness windows, aggressive prefetch.
    #[default]
    Development,
    /// Production: long staleness windows, essential-only prefetch.
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvVar(
                "QUICKCART_ENV".to_string(),
                format!("unknown environment '{other}'"),
            )),
        }
    }
}

/// How aggressively the prefetcher warms queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchPolicy {
    /// Warm adjacent pages and category/search variants (development).
    Aggressive,
    /// Warm only the first page of the default listing (production).
    Essential,
    /// No prefetching at all.
    Disabled,
}

/// Fetch-cache behavior derived from the environment.
///
/// An explicit value injected at construction so both configurations
/// are unit-testable; nothing in the fetch layer branches on
/// [`Environment`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age below which a cached page is served with no network call.
    pub stale_time: Duration,
    /// Age at which a cached page is garbage-collected outright.
    pub gc_time: Duration,
    /// Retries after a failed fetch (exponential backoff between them).
    pub retry_limit: u32,
    /// Prefetch aggressiveness.
    pub prefetch: PrefetchPolicy,
}

impl CacheConfig {
    /// The cache trade-off for a deployment environment.
    #[must_use]
    pub const fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                stale_time: Duration::from_secs(30),
                gc_time: Duration::from_secs(5 * 60),
                retry_limit: 1,
                prefetch: PrefetchPolicy::Aggressive,
            },
            Environment::Production => Self {
                stale_time: Duration::from_secs(5 * 60),
                gc_time: Duration::from_secs(30 * 60),
                retry_limit: 3,
                prefetch: PrefetchPolicy::Essential,
            },
        }
    }
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend.
    pub api_base_url: Url,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Payment initialization timeout (distinct so the UI can offer a
    /// retry on a hung payment provider).
    pub payment_timeout: Duration,
    /// Review image upload size cap in bytes.
    pub max_upload_bytes: u64,
    /// Allowed review image MIME types.
    pub allowed_image_types: Vec<String>,
    /// Default listing page size.
    pub default_page_size: u32,
    /// Listing page size ceiling.
    pub max_page_size: u32,
    /// Directory for durable local state; `None` disables file
    /// persistence (in-memory only).
    pub storage_dir: Option<PathBuf>,
    /// Deployment environment.
    pub environment: Environment,
    /// Fetch-cache behavior (derived from `environment` by default).
    pub cache: CacheConfig,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("QUICKCART_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("QUICKCART_API_BASE_URL".to_string(), e.to_string())
            })?;
        let environment = get_env_or_default("QUICKCART_ENV", "development").parse()?;
        let request_timeout =
            Duration::from_secs(parse_env_or("QUICKCART_REQUEST_TIMEOUT_SECS", 30)?);
        let payment_timeout =
            Duration::from_secs(parse_env_or("QUICKCART_PAYMENT_TIMEOUT_SECS", 15)?);
        let max_upload_bytes = parse_env_or("QUICKCART_MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?;
        let allowed_image_types = get_env_or_default(
            "QUICKCART_ALLOWED_IMAGE_TYPES",
            "image/jpeg,image/png,image/webp",
        )
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
        let default_page_size = parse_env_or("QUICKCART_DEFAULT_PAGE_SIZE", 12)?;
        let max_page_size = parse_env_or("QUICKCART_MAX_PAGE_SIZE", 50)?;
        let storage_dir = get_optional_env("QUICKCART_STORAGE_DIR").map(PathBuf::from);

        Ok(Self {
            api_base_url,
            request_timeout,
            payment_timeout,
            max_upload_bytes,
            allowed_image_types,
            default_page_size,
            max_page_size,
            storage_dir,
            environment,
            cache: CacheConfig::for_environment(environment),
        })
    }

    /// A configuration suitable for tests: in-memory persistence,
    /// development cache windows, localhost backend.
    ///
    /// # Panics
    ///
    /// Never panics; the base URL literal is valid.
    #[must_use]
    pub fn for_tests() -> Self {
        #[allow(clippy::unwrap_used)] // literal URL is valid
        let api_base_url = "http://127.0.0.1:4000/api/".parse().unwrap();
        Self {
            api_base_url,
            request_timeout: Duration::from_secs(5),
            payment_timeout: Duration::from_secs(2),
            max_upload_bytes: 1024 * 1024,
            allowed_image_types: vec!["image/png".to_string()],
            default_page_size: 12,
            max_page_size: 50,
            storage_dir: None,
            environment: Environment::Development,
            cache: CacheConfig::for_environment(Environment::Development),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
