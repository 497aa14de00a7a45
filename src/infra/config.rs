//! Centralized configuration (environment variables + defaults).
//!
//! Values are read from the process environment, after loading `.env` if one
//! exists. Malformed values are logged and replaced by their default.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Postgres connection string. Unset or blank means "no store": fixtures are served.
pub fn database_url() -> Option<String> {
    non_blank(var("DATABASE_URL"))
}

/// Address the API server listens on.
pub fn bind_address() -> String {
    non_blank(var("BIND_ADDRESS")).unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
}

pub fn store_max_connections() -> u32 {
    parse_or("STORE_MAX_CONNECTIONS", var("STORE_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS).max(1)
}

/// How long a request waits for a pooled store connection before giving up.
pub fn store_connect_timeout() -> Duration {
    let secs = parse_or(
        "STORE_CONNECT_TIMEOUT_SECS",
        var("STORE_CONNECT_TIMEOUT_SECS"),
        DEFAULT_CONNECT_TIMEOUT_SECS,
    );
    Duration::from_secs(secs.max(1))
}

/// Whether store failures are answered from the fixture set (default) or surfaced.
pub fn fixture_fallback() -> bool {
    match var("FIXTURE_FALLBACK") {
        None => true,
        Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
            warn!("Invalid FIXTURE_FALLBACK value '{}', using default: true", raw);
            true
        }),
    }
}

/// Base URL the `browse` client talks to.
pub fn api_url() -> String {
    non_blank(var("SNIPPET_API_URL")).unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Server-side settings gathered in one place.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub bind_address: String,
    pub store_max_connections: u32,
    pub store_connect_timeout: Duration,
    pub fixture_fallback: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            database_url: database_url(),
            bind_address: bind_address(),
            store_max_connections: store_max_connections(),
            store_connect_timeout: store_connect_timeout(),
            fixture_fallback: fixture_fallback(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            store_max_connections: DEFAULT_MAX_CONNECTIONS,
            store_connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            fixture_fallback: true,
        }
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match non_blank(raw) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {} value '{}': {}, using default: {}", key, raw, e, default);
            default
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_uses_default_for_missing_or_invalid_values() {
        assert_eq!(parse_or::<u32>("K", None, 5), 5);
        assert_eq!(parse_or::<u32>("K", Some("   ".into()), 5), 5);
        assert_eq!(parse_or::<u32>("K", Some("abc".into()), 5), 5);
        assert_eq!(parse_or::<u32>("K", Some(" 12 ".into()), 5), 12);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn default_config_serves_fixtures_without_a_store() {
        let config = AppConfig::default();
        assert!(config.database_url.is_none());
        assert!(config.fixture_fallback);
        assert_eq!(config.bind_address, "0.0.0.0:3000");
    }
}
