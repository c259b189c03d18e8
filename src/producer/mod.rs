//! Background producers that feed a [`RecentStore`](crate::store::RecentStore).

mod periodic;

pub use periodic::{validate_key_format, PeriodicProducer, DEFAULT_KEY_FORMAT};

use crate::error::Result;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifecycle of a producer: `Idle -> Running -> Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProducerState {
    Idle,
    Running,
    Stopped,
}

/// Something that can be started once to write into a store in the
/// background.
pub trait Producer: Send + Sync {
    /// Launch the background task. It runs until `shutdown` is cancelled or
    /// the returned handle is stopped. Stopping the handle leaves `shutdown`
    /// itself untouched.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted) on a second
    /// call, [`Error::InvalidConfig`](crate::Error::InvalidConfig) for a zero
    /// interval.
    fn start(&self, shutdown: CancellationToken, interval: Duration) -> Result<ProducerHandle>;

    fn state(&self) -> ProducerState;
}

/// Handle to a running producer task.
///
/// Only obtainable from [`Producer::start`], so a producer cannot be stopped
/// before it was started.
#[derive(Debug)]
pub struct ProducerHandle {
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ProducerHandle {
    pub(crate) fn new(shutdown: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            shutdown,
            task: Some(task),
        }
    }

    /// Cancel the producer and wait for its task to exit.
    ///
    /// A tick already being processed completes first. Calling this again
    /// after the task exited returns immediately.
    pub async fn stop(&mut self) {
        self.shutdown.cancel();
        self.wait().await;
    }

    /// Wait for the task to exit without cancelling it.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "producer task ended abnormally");
            }
        }
    }

    /// The token that stops this producer, a child of the token passed to
    /// [`Producer::start`].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}
