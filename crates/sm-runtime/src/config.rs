//! # Mesh Configuration
//!
//! Unified configuration for the store client and runtime parameters.
//! Every value has a sane default and an `SM_*` environment override.

use std::time::Duration;

use thiserror::Error;

use sm_01_document_store::{Backoff, RetryPolicy};

/// Complete mesh configuration.
#[derive(Debug, Clone, Default)]
pub struct MeshConfig {
    /// Store client configuration.
    pub store: StoreConfig,
    /// Email fan-out configuration.
    pub email: EmailConfig,
}

impl MeshConfig {
    /// Load configuration from the environment, starting from defaults.
    ///
    /// Recognized variables:
    /// - `SM_STORE_MAX_ATTEMPTS` - retry attempt budget
    /// - `SM_STORE_BACKOFF_INITIAL_MS` - first retry delay
    /// - `SM_STORE_BACKOFF_CAP_MS` - upper bound on any retry delay
    /// - `SM_STORE_CHANNEL_CAPACITY` - change-feed channel capacity
    /// - `SM_EMAIL_SIMULATION` - "true"/"false", simulated email fan-out
    ///
    /// Malformed values fall back to the default silently; validation of
    /// the resulting combination is [`MeshConfig::validate`]'s job.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(n) = env_parse::<u32>("SM_STORE_MAX_ATTEMPTS") {
            config.store.max_attempts = n;
        }
        if let Some(ms) = env_parse::<u64>("SM_STORE_BACKOFF_INITIAL_MS") {
            config.store.backoff_initial_ms = ms;
        }
        if let Some(ms) = env_parse::<u64>("SM_STORE_BACKOFF_CAP_MS") {
            config.store.backoff_cap_ms = ms;
        }
        if let Some(n) = env_parse::<usize>("SM_STORE_CHANNEL_CAPACITY") {
            config.store.channel_capacity = n;
        }
        if let Some(b) = env_parse::<bool>("SM_EMAIL_SIMULATION") {
            config.email.simulate_delivery = b;
        }
        config
    }

    /// Validate the configuration before wiring anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.store.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        if self.store.backoff_initial_ms > self.store.backoff_cap_ms {
            return Err(ConfigError::BackoffInitialAboveCap {
                initial_ms: self.store.backoff_initial_ms,
                cap_ms: self.store.backoff_cap_ms,
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `max_attempts` must be at least 1 (the first attempt).
    #[error("SM_STORE_MAX_ATTEMPTS must be at least 1")]
    ZeroAttempts,

    /// The change-feed channel cannot hold zero events.
    #[error("SM_STORE_CHANNEL_CAPACITY must be at least 1")]
    ZeroChannelCapacity,

    /// The backoff schedule is inverted.
    #[error("backoff initial delay {initial_ms}ms exceeds cap {cap_ms}ms")]
    BackoffInitialAboveCap {
        /// Configured initial delay.
        initial_ms: u64,
        /// Configured cap.
        cap_ms: u64,
    },
}

/// Store client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Retry attempt budget, including the first attempt.
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    pub backoff_initial_ms: u64,
    /// Upper bound on any single retry delay, in milliseconds.
    pub backoff_cap_ms: u64,
    /// Change-feed broadcast channel capacity.
    pub channel_capacity: usize,
}

impl StoreConfig {
    /// The retry policy this configuration describes.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = if self.max_attempts <= 1 {
            Backoff::None
        } else {
            Backoff::Exponential {
                initial: Duration::from_millis(self.backoff_initial_ms),
                cap: Duration::from_millis(self.backoff_cap_ms),
            }
        };
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            backoff_initial_ms: 50,
            backoff_cap_ms: 2_000,
            channel_capacity: sm_01_document_store::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Email fan-out configuration.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// When true, notification emails are simulated through the log-only
    /// mailer. There is no real delivery path in this repository.
    pub simulate_delivery: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            simulate_delivery: true,
        }
    }
}
