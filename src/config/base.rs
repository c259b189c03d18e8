//! Environment-driven configuration for the token server.

use crate::{error::Result, service::ValuesConfig, store::HistoryLimit};
use std::{net::IpAddr, str::FromStr, time::Duration};

/// Server configuration.
///
/// Reads from environment variables with sensible defaults:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `HOST` | `0.0.0.0` | Server bind address |
/// | `PORT` | `7755` | Server port |
/// | `TICK_INTERVAL_SECS` | `10` | Seconds between generated tokens |
/// | `TOKEN_LENGTH` | `6` | Letters per token |
/// | `HISTORY_LIMIT` | (none) | Max entries kept, unbounded if unset |
/// | `KEY_FORMAT` | `%Y-%m-%d_%H:%M:%S` | `chrono` format of entry keys |
/// | `REQUEST_TIMEOUT_SECS` | `7` | HTTP request timeout |
/// | `BLOCKED_IPS` | (none) | Comma-separated peer addresses to reject |
///
/// Values that fail to parse fall back to their default. Range checks
/// happen in [`values_config`](Self::values_config).
///
/// # Example
///
/// ```rust
/// use recent_tokens::BaseConfig;
///
/// let config = BaseConfig::from_lookup(|key| match key {
///     "PORT" => Some("8080".to_string()),
///     _ => None,
/// });
/// assert_eq!(config.socket_addr(), "0.0.0.0:8080");
/// assert!(config.values_config().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct BaseConfig {
    /// Server bind address (default: 0.0.0.0)
    pub host: String,
    /// Server port (default: 7755)
    pub port: u16,
    /// Producer tick interval in seconds (default: 10)
    pub tick_interval_secs: u64,
    /// Token length (default: 6)
    pub token_length: usize,
    /// Optional cap on stored entries
    pub history_limit: Option<usize>,
    /// Entry key format (default: `%Y-%m-%d_%H:%M:%S`)
    pub key_format: String,
    /// Request timeout in seconds (default: 7)
    pub request_timeout_secs: u64,
    /// Peers refused by the HTTP layer
    pub blocked_ips: Vec<IpAddr>,
}

impl BaseConfig {
    /// Create a new config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(7755),
            tick_interval_secs: parsed(&lookup, "TICK_INTERVAL_SECS").unwrap_or(10),
            token_length: parsed(&lookup, "TOKEN_LENGTH").unwrap_or(6),
            history_limit: parsed(&lookup, "HISTORY_LIMIT"),
            key_format: lookup("KEY_FORMAT")
                .unwrap_or_else(|| crate::producer::DEFAULT_KEY_FORMAT.to_string()),
            request_timeout_secs: parsed(&lookup, "REQUEST_TIMEOUT_SECS").unwrap_or(7),
            blocked_ips: lookup("BLOCKED_IPS")
                .map(|list| parse_ip_list(&list))
                .unwrap_or_default(),
        }
    }

    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Validated settings for the token pipeline.
    pub fn values_config(&self) -> Result<ValuesConfig> {
        let history_limit = self
            .history_limit
            .map_or(HistoryLimit::Unbounded, HistoryLimit::Bounded);

        ValuesConfig::builder()
            .tick_interval(self.tick_interval())
            .token_length(self.token_length)
            .history_limit(history_limit)
            .key_format(self.key_format.clone())
            .build()
    }

    /// Settings for the HTTP layer.
    #[cfg(feature = "transport")]
    pub fn transport_config(&self) -> crate::transport::TransportConfig {
        crate::transport::TransportConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            blocked_ips: self.blocked_ips.clone(),
        }
    }
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parsed<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_ip_list(list: &str) -> Vec<IpAddr> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match IpAddr::from_str(entry) {
            Ok(ip) => Some(ip),
            Err(_) => {
                tracing::warn!(entry, "ignoring invalid address in BLOCKED_IPS");
                None
            }
        })
        .collect()
}
