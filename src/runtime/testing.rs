//! Mock simulators for testing
//!
//! These mocks enable runtime tests without random failures or real delays.

use crate::simulator::{ResponseSimulator, SimulatorError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Simulator
// ============================================================================

/// Mock simulator that returns queued outcomes in order
pub struct MockSimulator {
    responses: Mutex<VecDeque<Result<String, SimulatorError>>>,
    /// Record of every outgoing text
    pub requests: Mutex<Vec<String>>,
}

impl MockSimulator {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: SimulatorError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn next_outcome(&self, text: &str) -> Result<String, SimulatorError> {
        self.requests.lock().unwrap().push(text.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SimulatorError::unavailable("No mock response queued")))
    }
}

impl Default for MockSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseSimulator for MockSimulator {
    async fn send(&self, text: &str) -> Result<String, SimulatorError> {
        self.next_outcome(text)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Delayed Mock Simulator (for in-flight testing)
// ============================================================================

/// Mock simulator with a configurable delay
pub struct DelayedMockSimulator {
    inner: MockSimulator,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockSimulator {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockSimulator::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, text: impl Into<String>) {
        self.inner.queue_reply(text);
    }
}

#[async_trait]
impl ResponseSimulator for DelayedMockSimulator {
    async fn send(&self, text: &str) -> Result<String, SimulatorError> {
        self.request_started.notify_waiters();
        tokio::time::sleep(self.delay).await;
        self.inner.next_outcome(text)
    }

    fn name(&self) -> &str {
        "delayed-mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatorErrorKind;

    #[tokio::test]
    async fn test_mock_simulator() {
        let mock = MockSimulator::new();
        mock.queue_reply("first");
        mock.queue_error(SimulatorError::unavailable("boom"));

        assert_eq!(mock.send("a").await.unwrap(), "first");
        assert_eq!(mock.send("b").await.unwrap_err().message, "boom");
        // Empty queue fails rather than hanging
        assert_eq!(
            mock.send("c").await.unwrap_err().kind,
            SimulatorErrorKind::Unavailable
        );
        assert_eq!(mock.recorded_requests(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delayed_mock_notifies_on_start() {
        let mock = Arc::new(DelayedMockSimulator::new(Duration::from_millis(10)));
        mock.queue_reply("slow");
        let started = mock.request_started.clone();
        let notified = started.notified();

        let task = tokio::spawn({
            let mock = mock.clone();
            async move { mock.send("q").await }
        });
        notified.await;
        assert_eq!(task.await.unwrap().unwrap(), "slow");
    }
}
