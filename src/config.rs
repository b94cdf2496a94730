//! Environment-driven configuration

use crate::simulator::{DEFAULT_FAILURE_RATE, DEFAULT_REPLY_DELAY};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_EVENT_BUFFER: usize = 64;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var}: {value} is outside {min}..={max}")]
    OutOfRange {
        var: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{var}: must be greater than zero")]
    Zero { var: &'static str },
}

/// Runtime and simulator settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Simulated thinking time before each reply
    pub reply_delay: Duration,
    /// Probability in `[0, 1]` that a reply fails
    pub failure_rate: f64,
    /// Replies slower than this count as failed
    pub reply_timeout: Duration,
    /// Capacity of the runtime's event channel
    pub event_buffer: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            failure_rate: DEFAULT_FAILURE_RATE,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let reply_delay = parse::<u64>(&lookup, "CHATDECK_REPLY_DELAY_MS")?
            .map_or(defaults.reply_delay, Duration::from_millis);

        let failure_rate =
            parse::<f64>(&lookup, "CHATDECK_FAILURE_RATE")?.unwrap_or(defaults.failure_rate);
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(ConfigError::OutOfRange {
                var: "CHATDECK_FAILURE_RATE",
                value: failure_rate,
                min: 0.0,
                max: 1.0,
            });
        }

        let reply_timeout = parse::<u64>(&lookup, "CHATDECK_REPLY_TIMEOUT_MS")?
            .map_or(defaults.reply_timeout, Duration::from_millis);
        if reply_timeout.is_zero() {
            return Err(ConfigError::Zero {
                var: "CHATDECK_REPLY_TIMEOUT_MS",
            });
        }

        let event_buffer =
            parse::<usize>(&lookup, "CHATDECK_EVENT_BUFFER")?.unwrap_or(defaults.event_buffer);
        if event_buffer == 0 {
            return Err(ConfigError::Zero {
                var: "CHATDECK_EVENT_BUFFER",
            });
        }

        Ok(Self {
            reply_delay,
            failure_rate,
            reply_timeout,
            event_buffer,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
