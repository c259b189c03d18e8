//! Recent Tokens - a periodic random token producer.
//!
//! A background task generates a short random token on every tick and
//! records it in a store that tracks the two most recent insertions. Readers
//! fetch that pair concurrently with the producer.
//!
//! - **token**: Pseudo-random token generation from an injected source
//! - **store**: The [`RecentStore`] capability and its in-memory backend
//! - **producer**: The interval-driven [`PeriodicProducer`]
//! - **service**: [`ValuesService`], the facade used by the HTTP layer
//! - **config**: Configuration from environment variables
//! - **transport**: The `GET /api/hash` endpoint
//! - **bootstrap**: Tracing setup and server wiring
//!
//! # Features
//!
//! - `config` - Environment configuration (enabled by default)
//! - `transport` - HTTP endpoint (enabled by default)
//! - `bootstrap` - Tracing setup and `run` (enabled by default)
//! - `full` - All features
//!
//! # Example
//!
//! ```rust,ignore
//! use recent_tokens::{init_tracing, run, BaseConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing("recent_tokens=info")?;
//!     run(BaseConfig::from_env(), CancellationToken::new()).await
//! }
//! ```

pub mod error;
pub mod producer;
pub mod service;
pub mod store;
pub mod token;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "transport")]
pub mod transport;

#[cfg(feature = "bootstrap")]
pub mod bootstrap;

// Re-exports for convenience
pub use error::{Error, Result};
pub use producer::{PeriodicProducer, Producer, ProducerHandle, ProducerState};
pub use service::{ValuesConfig, ValuesService};
pub use store::{HistoryLimit, MemoryStore, RecentStore};
pub use token::{RandSource, SeededRandom, Token, TokenGenerator};

#[cfg(feature = "config")]
pub use config::BaseConfig;

#[cfg(feature = "transport")]
pub use transport::{router, IpFilterLayer, TransportConfig};

#[cfg(feature = "bootstrap")]
pub use bootstrap::{init_tracing, run, shutdown_on_signal};
