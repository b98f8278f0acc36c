//! Client configuration
//!
//! Loaded from a JSON file; every field is optional:
//!
//! ```json
//! {
//!   "poll_initial_delay_ms": 250,
//!   "poll_max_delay_ms": 5000,
//!   "poll_max_attempts": 10,
//!   "poll_jitter": true,
//!   "visibility_delay_ms": 0
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::errors::{ClientError, ClientResult};
use super::poll::RetryPolicy;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// First backoff delay in milliseconds (default 250)
    #[serde(default = "default_poll_initial_delay_ms")]
    pub poll_initial_delay_ms: u64,

    /// Backoff ceiling in milliseconds (default 5000)
    #[serde(default = "default_poll_max_delay_ms")]
    pub poll_max_delay_ms: u64,

    /// Attempts before a poll times out (default 10)
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Randomize backoff delays (default true)
    #[serde(default = "default_poll_jitter")]
    pub poll_jitter: bool,

    /// Listing lag simulated by the in-memory backend (default 0)
    #[serde(default)]
    pub visibility_delay_ms: u64,
}

fn default_poll_initial_delay_ms() -> u64 {
    250
}
fn default_poll_max_delay_ms() -> u64 {
    5000
}
fn default_poll_max_attempts() -> u32 {
    10
}
fn default_poll_jitter() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_initial_delay_ms: default_poll_initial_delay_ms(),
            poll_max_delay_ms: default_poll_max_delay_ms(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_jitter: default_poll_jitter(),
            visibility_delay_ms: 0,
        }
    }
}

impl ClientConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("Failed to read config: {}", e)))?;

        let config: ClientConfig = serde_json::from_str(&content)
            .map_err(|e| ClientError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
        Ok(config)
    }

    fn validate(&self) -> ClientResult<()> {
        if self.poll_max_attempts == 0 {
            return Err(ClientError::Config("poll_max_attempts must be > 0".into()));
        }

        if self.poll_initial_delay_ms > self.poll_max_delay_ms {
            return Err(ClientError::Config(format!(
                "poll_initial_delay_ms ({}) exceeds poll_max_delay_ms ({})",
                self.poll_initial_delay_ms, self.poll_max_delay_ms
            )));
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.poll_initial_delay_ms),
            max_delay: Duration::from_millis(self.poll_max_delay_ms),
            max_attempts: self.poll_max_attempts,
            jitter: self.poll_jitter,
        }
    }

    pub fn visibility_delay(&self) -> Duration {
        Duration::from_millis(self.visibility_delay_ms)
    }
}
