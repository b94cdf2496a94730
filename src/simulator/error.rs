//! Reply simulator error types

use thiserror::Error;

/// Simulator error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SimulatorError {
    pub kind: SimulatorErrorKind,
    pub message: String,
}

impl SimulatorError {
    pub fn new(kind: SimulatorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SimulatorErrorKind::Unavailable, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SimulatorErrorKind::Timeout, message)
    }
}

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorErrorKind {
    /// The simulated backend refused to answer
    Unavailable,
    /// No answer within the allotted time
    Timeout,
}

impl SimulatorErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable | Self::Timeout)
    }
}
