//! Session configuration: default wait timeout and poll interval.
//!
//! Values come from code, a YAML file, or environment variables:
//!
//! ```yaml
//! default_timeout_ms: 15000
//! poll_interval_ms: 200
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::result::{PinpointError, PinpointResult};

/// Environment variable overriding the default timeout
pub const ENV_DEFAULT_TIMEOUT_MS: &str = "PINPOINT_DEFAULT_TIMEOUT_MS";
/// Environment variable overriding the poll interval
pub const ENV_POLL_INTERVAL_MS: &str = "PINPOINT_POLL_INTERVAL_MS";

/// Default wait timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
/// Default sleep between poll evaluations in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Timing configuration shared by every wait in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Timeout used when a wait is given none
    pub default_timeout_ms: u64,
    /// Sleep between poll evaluations
    pub poll_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// Create a config with default timings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout
    #[must_use]
    pub const fn with_timeout(mut self, ms: u64) -> Self {
        self.default_timeout_ms = ms;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Default timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reject configurations the poll engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`PinpointError::Config`] for a zero poll interval.
    pub fn validate(self) -> PinpointResult<Self> {
        if self.poll_interval_ms == 0 {
            return Err(PinpointError::config("poll_interval_ms must be greater than zero"));
        }
        Ok(self)
    }

    /// Parse a YAML document; missing keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns a YAML error for malformed input or unknown keys, and
    /// [`PinpointError::Config`] for invalid values.
    pub fn from_yaml_str(yaml: &str) -> PinpointResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, otherwise as
    /// [`SessionConfig::from_yaml_str`].
    pub fn load(path: impl AsRef<Path>) -> PinpointResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "loaded session config");
        Ok(config)
    }

    /// Defaults overridden by `PINPOINT_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`PinpointError::Config`] when a variable is not an integer or
    /// the result fails validation.
    pub fn from_env() -> PinpointResult<Self> {
        Self::default().with_env_overrides()
    }

    /// This config with any `PINPOINT_*` environment variables laid over it
    ///
    /// # Errors
    ///
    /// Same as [`SessionConfig::from_env`].
    pub fn with_env_overrides(self) -> PinpointResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; the environment in production
    fn apply_overrides<F>(mut self, lookup: F) -> PinpointResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = parse_ms(&lookup, ENV_DEFAULT_TIMEOUT_MS)? {
            self.default_timeout_ms = ms;
        }
        if let Some(ms) = parse_ms(&lookup, ENV_POLL_INTERVAL_MS)? {
            self.poll_interval_ms = ms;
        }
        self.validate()
    }
}

fn parse_ms<F>(lookup: &F, key: &str) -> PinpointResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| PinpointError::config(format!("{key} must be milliseconds, got {raw:?}")))
        })
        .transpose()
}
