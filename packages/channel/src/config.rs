//! Channel configuration.

use thiserror::Error;

/// Default number of messages retained for newcomers
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Default number of messages the broadcast queue holds before `send` blocks
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The broadcast queue needs room for at least one message
    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,
}

/// Capacities fixed at channel construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Maximum number of messages kept in history (0 disables history)
    pub history_capacity: usize,
    /// Maximum number of queued, not yet dispatched messages
    pub queue_capacity: usize,
}

impl ChannelConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroQueueCapacity` if `queue_capacity` is 0
    pub fn new(history_capacity: usize, queue_capacity: usize) -> Result<Self, ConfigError> {
        let config = Self {
            history_capacity,
            queue_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroQueueCapacity` if `queue_capacity` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
