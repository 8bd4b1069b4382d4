//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `CHECKOUT_DELAY_MS` - Simulated payment processing time (default: 2000)
//! - `LISTING_DELAY_MS` - Simulated listing submission time (default: 1500)
//! - `SESSION_EXPIRY_DAYS` - Days of inactivity before a visitor's cart is dropped (default: 7)
//! - `SESSION_CACHE_MB` - Memory budget for visitor sessions, in MiB (default: 256)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CHECKOUT_DELAY_MS: u64 = 2000;
const DEFAULT_LISTING_DELAY_MS: u64 = 1500;
const DEFAULT_SESSION_EXPIRY_DAYS: i64 = 7;
const DEFAULT_SESSION_CACHE_MB: u64 = 256;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// How long "processing payment" takes before an order is placed
    pub checkout_delay: Duration,
    /// How long "listing product" takes before the seller sees confirmation
    pub listing_delay: Duration,
    /// Session inactivity expiry in days
    pub session_expiry_days: i64,
    /// Memory budget for held sessions, in MiB
    pub session_cache_mb: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{DEFAULT_PORT}"),
            checkout_delay: Duration::from_millis(DEFAULT_CHECKOUT_DELAY_MS),
            listing_delay: Duration::from_millis(DEFAULT_LISTING_DELAY_MS),
            session_expiry_days: DEFAULT_SESSION_EXPIRY_DAYS,
            session_cache_mb: DEFAULT_SESSION_CACHE_MB,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "STOREFRONT_HOST", defaults.host)?;
        let port = parse_or(&lookup, "STOREFRONT_PORT", defaults.port)?;
        let base_url = lookup("STOREFRONT_BASE_URL")
            .map_or_else(|| format!("http://localhost:{port}"), |url| {
                url.trim_end_matches('/').to_string()
            });
        let checkout_delay = Duration::from_millis(parse_or(
            &lookup,
            "CHECKOUT_DELAY_MS",
            DEFAULT_CHECKOUT_DELAY_MS,
        )?);
        let listing_delay = Duration::from_millis(parse_or(
            &lookup,
            "LISTING_DELAY_MS",
            DEFAULT_LISTING_DELAY_MS,
        )?);
        let session_expiry_days =
            parse_or(&lookup, "SESSION_EXPIRY_DAYS", defaults.session_expiry_days)?;
        if session_expiry_days <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_EXPIRY_DAYS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let session_cache_mb = parse_or(&lookup, "SESSION_CACHE_MB", defaults.session_cache_mb)?;
        if session_cache_mb == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_CACHE_MB".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            checkout_delay,
            listing_delay,
            session_expiry_days,
            session_cache_mb,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }

    /// Session memory budget in bytes.
    #[must_use]
    pub const fn session_cache_bytes(&self) -> u64 {
        self.session_cache_mb.saturating_mul(1024 * 1024)
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if present, otherwise use the default.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Treat empty strings the same as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
