//! Runtime configuration.
//!
//! Read from environment variables; `main` loads a `.env.local` file first
//! when one exists.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::TripsClientConfig;
use crate::cache::CacheConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be a socket address like 127.0.0.1:3000, got {value:?}")]
    InvalidAddress { key: &'static str, value: String },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub trips: TripsClientConfig,
    pub bind_addr: SocketAddr,
    pub cache: CacheConfig,
    /// Where logged-in identities are kept; `None` keeps them in memory
    pub session_store_path: Option<PathBuf>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Serve canned trips from this file instead of calling the trips API
    pub mock_trips_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            trips: TripsClientConfig::default(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cache: CacheConfig::default(),
            session_store_path: Some(PathBuf::from("sessions.json")),
            static_dir: PathBuf::from("static"),
            mock_trips_path: None,
        }
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

impl ClientConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("TRIPS_API_URL") {
            config.trips = config.trips.with_base_url(url);
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            config.trips = config
                .trips
                .with_timeout(parse_number("REQUEST_TIMEOUT_SECS", &secs)?);
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr.trim().parse().map_err(|_| ConfigError::InvalidAddress {
                key: "BIND_ADDR",
                value: addr.clone(),
            })?;
        }
        if let Some(secs) = lookup("SESSION_IDLE_SECS") {
            config.cache.time_to_idle =
                Duration::from_secs(parse_number("SESSION_IDLE_SECS", &secs)?);
        }
        if let Some(n) = lookup("SESSION_CAPACITY") {
            config.cache.max_capacity = parse_number("SESSION_CAPACITY", &n)?;
        }
        if let Some(path) = lookup("SESSION_STORE_PATH") {
            config.session_store_path = (!path.is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("MOCK_TRIPS_PATH").filter(|p| !p.is_empty()) {
            config.mock_trips_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.trips.base_url, "http://localhost:5000/api");
        assert_eq!(config.trips.timeout_secs, 30);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.cache.time_to_idle, Duration::from_secs(3600));
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.session_store_path, Some(PathBuf::from("sessions.json")));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.mock_trips_path, None);
    }

    #[test]
    fn overrides() {
        let config = from_pairs(&[
            ("TRIPS_API_URL", "https://trips.example.org/api/"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("SESSION_IDLE_SECS", "60"),
            ("SESSION_CAPACITY", "10"),
            ("SESSION_STORE_PATH", ""),
            ("MOCK_TRIPS_PATH", "data/mock_trips.json"),
        ])
        .unwrap();
        assert_eq!(config.trips.base_url, "https://trips.example.org/api");
        assert_eq!(config.trips.timeout_secs, 5);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cache.time_to_idle, Duration::from_secs(60));
        assert_eq!(config.cache.max_capacity, 10);
        assert_eq!(config.session_store_path, None);
        assert_eq!(
            config.mock_trips_path,
            Some(PathBuf::from("data/mock_trips.json"))
        );
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            from_pairs(&[("REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err(),
            ConfigError::InvalidNumber {
                key: "REQUEST_TIMEOUT_SECS",
                value: "soon".into()
            }
        );
        assert!(from_pairs(&[("SESSION_CAPACITY", "0")]).is_err());
        assert!(matches!(
            from_pairs(&[("BIND_ADDR", "localhost")]),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }
}
