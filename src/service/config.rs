//! Validated settings for [`ValuesService`](super::ValuesService).

use crate::{
    error::{Error, Result},
    producer::{validate_key_format, DEFAULT_KEY_FORMAT},
    store::HistoryLimit,
    token::DEFAULT_TOKEN_LENGTH,
};
use std::time::Duration;

/// Default producer tick interval.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Settings for the token pipeline.
///
/// Fields are private; build with [`ValuesConfig::builder`] so every value is
/// checked before a service is constructed.
///
/// # Example
///
/// ```rust
/// use recent_tokens::ValuesConfig;
/// use std::time::Duration;
///
/// let config = ValuesConfig::builder()
///     .tick_interval(Duration::from_secs(2))
///     .token_length(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.token_length(), 8);
///
/// assert!(ValuesConfig::builder().token_length(0).build().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValuesConfig {
    tick_interval: Duration,
    token_length: usize,
    history_limit: HistoryLimit,
    key_format: String,
}

impl ValuesConfig {
    pub fn builder() -> ValuesConfigBuilder {
        ValuesConfigBuilder::default()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn token_length(&self) -> usize {
        self.token_length
    }

    pub fn history_limit(&self) -> HistoryLimit {
        self.history_limit
    }

    pub fn key_format(&self) -> &str {
        &self.key_format
    }
}

impl Default for ValuesConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            token_length: DEFAULT_TOKEN_LENGTH,
            history_limit: HistoryLimit::Unbounded,
            key_format: DEFAULT_KEY_FORMAT.to_string(),
        }
    }
}

/// Builder for [`ValuesConfig`], starting from the defaults.
#[derive(Clone, Debug, Default)]
pub struct ValuesConfigBuilder {
    config: ValuesConfig,
}

impl ValuesConfigBuilder {
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = interval;
        self
    }

    pub fn token_length(mut self, length: usize) -> Self {
        self.config.token_length = length;
        self
    }

    pub fn history_limit(mut self, limit: HistoryLimit) -> Self {
        self.config.history_limit = limit;
        self
    }

    pub fn key_format(mut self, format: impl Into<String>) -> Self {
        self.config.key_format = format.into();
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ValuesConfig> {
        let config = self.config;

        if config.tick_interval.is_zero() {
            return Err(Error::invalid_config("tick interval must be non-zero"));
        }
        if config.token_length == 0 {
            return Err(Error::invalid_config("token length must be at least 1"));
        }
        config.history_limit.validate()?;
        validate_key_format(&config.key_format)?;

        Ok(config)
    }
}
