//! Error types shared by the store, producer and service.

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants the token pipeline can emit.
///
/// Every variant is recoverable: callers get a value back, the process never
/// aborts on a reachable input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Fewer than two tokens have been recorded so far.
    #[error("not enough tokens recorded yet")]
    InsufficientEntries,

    /// A tracked key does not resolve in the backing map.
    #[error("tracked key `{key}` not found in store")]
    MissingReference { key: String },

    /// The producer was started more than once.
    #[error("producer already started")]
    AlreadyStarted,

    /// The producer was started outside a Tokio runtime.
    #[error("no Tokio runtime available: {reason}")]
    NoRuntime { reason: String },

    /// A configuration value was rejected during validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
