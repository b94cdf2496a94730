//! Assistant reply simulation
//!
//! The chat view treats reply generation as an opaque asynchronous
//! collaborator: given the outgoing text it eventually yields a reply or fails.

mod canned;
mod error;

pub use canned::{CannedResponder, DEFAULT_FAILURE_RATE, DEFAULT_REPLY_DELAY};
pub use error::{SimulatorError, SimulatorErrorKind};

use async_trait::async_trait;
use std::sync::Arc;

/// Produces assistant replies
#[async_trait]
pub trait ResponseSimulator: Send + Sync {
    /// Reply to `text`, or fail
    async fn send(&self, text: &str) -> Result<String, SimulatorError>;

    /// Name used in log lines
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ResponseSimulator + ?Sized> ResponseSimulator for Arc<T> {
    async fn send(&self, text: &str) -> Result<String, SimulatorError> {
        (**self).send(text).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for simulators
pub struct LoggingSimulator<S> {
    inner: S,
}

impl<S: ResponseSimulator> LoggingSimulator<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ResponseSimulator> ResponseSimulator for LoggingSimulator<S> {
    async fn send(&self, text: &str) -> Result<String, SimulatorError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(text).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    simulator = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    reply_len = reply.len(),
                    "Reply generated"
                );
            }
            Err(e) => {
                tracing::warn!(
                    simulator = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Reply failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
