//! Interval-driven token producer.

use super::{Producer, ProducerHandle, ProducerState};
use crate::{
    error::{Error, Result},
    store::RecentStore,
    token::TokenGenerator,
};
use chrono::format::{Item, StrftimeItems};
use parking_lot::Mutex;
use std::{fmt::Write as _, sync::Arc, time::Duration};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Default `chrono` format for entry keys (second resolution).
pub const DEFAULT_KEY_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Reject `chrono` format strings that would fail at formatting time.
pub fn validate_key_format(format: &str) -> Result<()> {
    if format.is_empty() {
        return Err(Error::invalid_config("key format must not be empty"));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::invalid_config(format!(
            "key format `{format}` is not a valid strftime pattern"
        )));
    }
    Ok(())
}

/// Generates a token every tick and records it in a [`RecentStore`] under
/// the local timestamp of the tick.
///
/// The first tick fires one interval after [`start`](Producer::start).
pub struct PeriodicProducer {
    store: Arc<dyn RecentStore>,
    generator: TokenGenerator,
    key_format: Arc<str>,
    state: Arc<Mutex<ProducerState>>,
}

impl PeriodicProducer {
    pub fn new(store: Arc<dyn RecentStore>, generator: TokenGenerator) -> Self {
        Self {
            store,
            generator,
            key_format: Arc::from(DEFAULT_KEY_FORMAT),
            state: Arc::new(Mutex::new(ProducerState::Idle)),
        }
    }

    /// Use a custom `chrono` format for entry keys.
    pub fn with_key_format(mut self, format: &str) -> Result<Self> {
        validate_key_format(format)?;
        self.key_format = Arc::from(format);
        Ok(self)
    }
}

impl Producer for PeriodicProducer {
    fn start(&self, shutdown: CancellationToken, interval: Duration) -> Result<ProducerHandle> {
        if interval.is_zero() {
            return Err(Error::invalid_config("tick interval must be non-zero"));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| Error::NoRuntime {
            reason: e.to_string(),
        })?;

        let mut state = self.state.lock();
        if *state != ProducerState::Idle {
            return Err(Error::AlreadyStarted);
        }
        *state = ProducerState::Running;

        // Stopping this producer must not cancel the caller's token.
        let shutdown = shutdown.child_token();
        let ticker = TickLoop {
            store: Arc::clone(&self.store),
            generator: self.generator.clone(),
            key_format: Arc::clone(&self.key_format),
            state: Arc::clone(&self.state),
        };
        let task = runtime.spawn(ticker.run(shutdown.clone(), interval));

        tracing::info!(?interval, "producer started");
        Ok(ProducerHandle::new(shutdown, task))
    }

    fn state(&self) -> ProducerState {
        *self.state.lock()
    }
}

struct TickLoop {
    store: Arc<dyn RecentStore>,
    generator: TokenGenerator,
    key_format: Arc<str>,
    state: Arc<Mutex<ProducerState>>,
}

impl TickLoop {
    async fn run(self, shutdown: CancellationToken, interval: Duration) {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => self.tick(),
            }
        }

        *self.state.lock() = ProducerState::Stopped;
        tracing::info!("producer stopped");
    }

    // No await points in here: a tick that has begun always finishes.
    fn tick(&self) {
        let mut key = String::new();
        if write!(key, "{}", chrono::Local::now().format(&self.key_format)).is_err() {
            tracing::warn!(format = %self.key_format, "failed to format entry key, skipping tick");
            return;
        }

        let token = self.generator.next();
        tracing::debug!(%key, %token, "recording token");

        if let Err(e) = self.store.insert(key, token) {
            tracing::warn!(error = %e, "failed to record token");
        }
    }
}
