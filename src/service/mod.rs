//! Facade over a producer and the store it writes to.

mod config;

pub use config::{ValuesConfig, ValuesConfigBuilder, DEFAULT_TICK_INTERVAL};

use crate::{
    error::Result,
    producer::{PeriodicProducer, Producer, ProducerHandle, ProducerState},
    store::{MemoryStore, RecentStore},
    token::{Token, TokenGenerator},
};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

/// The token pipeline as seen by the transport layer.
///
/// Cheap to clone; clones share the producer and the store.
///
/// # Example
///
/// ```rust,no_run
/// use recent_tokens::{ValuesConfig, ValuesService};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> recent_tokens::Result<()> {
/// let service = ValuesService::new(ValuesConfig::default())?;
/// let shutdown = CancellationToken::new();
/// let mut producer = service.start(shutdown.clone())?;
///
/// match service.latest() {
///     Ok([older, newer]) => println!("{older} {newer}"),
///     Err(e) => println!("not ready: {e}"),
/// }
///
/// producer.stop().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ValuesService {
    producer: Arc<dyn Producer>,
    store: Arc<dyn RecentStore>,
    tick_interval: Duration,
}

impl ValuesService {
    /// Build a [`MemoryStore`] and a [`PeriodicProducer`] from `config`.
    pub fn new(config: ValuesConfig) -> Result<Self> {
        let store: Arc<dyn RecentStore> =
            Arc::new(MemoryStore::with_limit(config.history_limit())?);
        let producer = PeriodicProducer::new(
            Arc::clone(&store),
            TokenGenerator::new(config.token_length()),
        )
        .with_key_format(config.key_format())?;

        Ok(Self::from_parts(&config, Arc::new(producer), store))
    }

    /// Assemble a service from existing components.
    ///
    /// `producer` is expected to write into `store`.
    pub fn from_parts(
        config: &ValuesConfig,
        producer: Arc<dyn Producer>,
        store: Arc<dyn RecentStore>,
    ) -> Self {
        Self {
            producer,
            store,
            tick_interval: config.tick_interval(),
        }
    }

    /// Start producing at the configured interval.
    pub fn start(&self, shutdown: CancellationToken) -> Result<ProducerHandle> {
        self.start_with_interval(shutdown, self.tick_interval)
    }

    pub fn start_with_interval(
        &self,
        shutdown: CancellationToken,
        interval: Duration,
    ) -> Result<ProducerHandle> {
        self.producer.start(shutdown, interval)
    }

    /// The two most recent tokens, older first.
    ///
    /// Store errors are returned unchanged.
    pub fn latest(&self) -> Result<[Token; 2]> {
        self.store.latest_two()
    }

    pub fn producer_state(&self) -> ProducerState {
        self.producer.state()
    }

    pub fn store(&self) -> &Arc<dyn RecentStore> {
        &self.store
    }
}
