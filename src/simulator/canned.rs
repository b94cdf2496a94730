//! Canned-reply simulator with a fixed delay and random failures

use super::{ResponseSimulator, SimulatorError};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_FAILURE_RATE: f64 = 0.6;

const CANNED_REPLIES: [&str; 4] = [
    "I understand your perspective. Let me help you with that.",
    "That's an interesting point. Here's what I think...",
    "Based on what you've said, I would suggest...",
    "Let me analyze that for you...",
];

/// Replies after `delay` with a random canned answer, or fails with
/// probability `failure_rate`
#[derive(Debug, Clone)]
pub struct CannedResponder {
    delay: Duration,
    failure_rate: f64,
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY, DEFAULT_FAILURE_RATE)
    }
}

impl CannedResponder {
    /// `failure_rate` is clamped into `[0, 1]`; NaN falls back to the default
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            DEFAULT_FAILURE_RATE
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            delay,
            failure_rate,
        }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ResponseSimulator for CannedResponder {
    async fn send(&self, _text: &str) -> Result<String, SimulatorError> {
        tokio::time::sleep(self.delay).await;

        let mut rng = rand::thread_rng();
        if rng.gen_bool(self.failure_rate) {
            return Err(SimulatorError::unavailable("AI response failed"));
        }
        let reply = CANNED_REPLIES
            .choose(&mut rng)
            .copied()
            .unwrap_or(CANNED_REPLIES[0]);
        Ok(reply.to_string())
    }

    fn name(&self) -> &str {
        "canned"
    }
}
