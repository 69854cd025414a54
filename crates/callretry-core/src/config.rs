//! Loading retry configuration from TOML, JSON or the environment.
//!
//! [`RetryConfig`] is the plain, serializable form of a
//! [`RetryPolicy`] plus the process-wide exclude-internal toggle. Durations are
//! whole milliseconds. For `maximum_interval_ms` and `maximum_attempts`, `0`
//! stands for "unbounded" / "unlimited"; a zero initial or expiration interval
//! is rejected by [`RetryConfig::to_policy`]:
//!
//! ```toml
//! initial_interval_ms = 100
//! maximum_interval_ms = 5000
//! maximum_attempts = 5
//! exclude_internal_errors = true
//! ```

use crate::error::ConfigError;
use crate::retry::{
    DEFAULT_BACKOFF_COEFFICIENT, DEFAULT_EXPIRATION_INTERVAL, DEFAULT_JITTER,
    DEFAULT_MAXIMUM_INTERVAL, ExcludeInternalFlag, RetryPolicy,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Serializable retry configuration.
///
/// Only `initial_interval_ms` is required; everything else defaults to the
/// [`RetryPolicy::new`] defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Delay before the first retry, in milliseconds.
    pub initial_interval_ms: u64,

    /// Multiplier applied per attempt.
    #[serde(default = "default_backoff_coefficient")]
    pub backoff_coefficient: f64,

    /// Ceiling on a single delay in milliseconds, `0` for unbounded.
    #[serde(default = "default_maximum_interval_ms")]
    pub maximum_interval_ms: u64,

    /// Budget for the whole sequence in milliseconds when no deadline is set.
    #[serde(default = "default_expiration_interval_ms")]
    pub expiration_interval_ms: u64,

    /// Symmetric randomization of each delay, in `[0, 1)`.
    #[serde(default = "default_jitter")]
    pub jitter: f64,

    /// Cap on total attempts, `0` for unlimited.
    #[serde(default)]
    pub maximum_attempts: u32,

    /// Leave `INTERNAL` failures out of the retryable set.
    #[serde(default)]
    pub exclude_internal_errors: bool,
}

fn default_backoff_coefficient() -> f64 {
    DEFAULT_BACKOFF_COEFFICIENT
}

fn default_maximum_interval_ms() -> u64 {
    DEFAULT_MAXIMUM_INTERVAL.map_or(0, saturating_millis)
}

fn default_expiration_interval_ms() -> u64 {
    saturating_millis(DEFAULT_EXPIRATION_INTERVAL)
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Whole milliseconds in `duration`, or an error if any precision would be lost.
fn exact_millis(field: &'static str, duration: Duration) -> Result<u64, ConfigError> {
    let millis = u64::try_from(duration.as_millis())
        .ok()
        .filter(|_| duration.subsec_nanos() % 1_000_000 == 0);
    millis.ok_or(ConfigError::UnrepresentableDuration { field, duration })
}

fn default_jitter() -> f64 {
    DEFAULT_JITTER
}

const ENV_INITIAL_INTERVAL_MS: &str = "CALLRETRY_INITIAL_INTERVAL_MS";
const ENV_BACKOFF_COEFFICIENT: &str = "CALLRETRY_BACKOFF_COEFFICIENT";
const ENV_MAXIMUM_INTERVAL_MS: &str = "CALLRETRY_MAXIMUM_INTERVAL_MS";
const ENV_EXPIRATION_INTERVAL_MS: &str = "CALLRETRY_EXPIRATION_INTERVAL_MS";
const ENV_JITTER: &str = "CALLRETRY_JITTER";
const ENV_MAXIMUM_ATTEMPTS: &str = "CALLRETRY_MAXIMUM_ATTEMPTS";
const ENV_EXCLUDE_INTERNAL_ERRORS: &str = "CALLRETRY_EXCLUDE_INTERNAL_ERRORS";

impl RetryConfig {
    /// Configuration with the given initial interval in milliseconds and
    /// defaults elsewhere.
    pub fn new(initial_interval_ms: u64) -> Self {
        Self {
            initial_interval_ms,
            backoff_coefficient: default_backoff_coefficient(),
            maximum_interval_ms: default_maximum_interval_ms(),
            expiration_interval_ms: default_expiration_interval_ms(),
            jitter: default_jitter(),
            maximum_attempts: 0,
            exclude_internal_errors: false,
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `CALLRETRY_INITIAL_INTERVAL_MS` (required)
    /// - `CALLRETRY_BACKOFF_COEFFICIENT`
    /// - `CALLRETRY_MAXIMUM_INTERVAL_MS`
    /// - `CALLRETRY_EXPIRATION_INTERVAL_MS`
    /// - `CALLRETRY_JITTER`
    /// - `CALLRETRY_MAXIMUM_ATTEMPTS`
    /// - `CALLRETRY_EXCLUDE_INTERNAL_ERRORS` (`true`/`false`/`1`/`0`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let initial_interval_ms: u64 = env_var(ENV_INITIAL_INTERVAL_MS)?
            .ok_or(ConfigError::MissingVar(ENV_INITIAL_INTERVAL_MS))?;

        let mut config = Self {
            initial_interval_ms,
            ..Self::new(0)
        };

        if let Some(coefficient) = env_var(ENV_BACKOFF_COEFFICIENT)? {
            config.backoff_coefficient = coefficient;
        }
        if let Some(maximum) = env_var(ENV_MAXIMUM_INTERVAL_MS)? {
            config.maximum_interval_ms = maximum;
        }
        if let Some(expiration) = env_var(ENV_EXPIRATION_INTERVAL_MS)? {
            config.expiration_interval_ms = expiration;
        }
        if let Some(jitter) = env_var(ENV_JITTER)? {
            config.jitter = jitter;
        }
        if let Some(attempts) = env_var(ENV_MAXIMUM_ATTEMPTS)? {
            config.maximum_attempts = attempts;
        }
        if let Some(exclude) = env_flag(ENV_EXCLUDE_INTERNAL_ERRORS)? {
            config.exclude_internal_errors = exclude;
        }

        Ok(config)
    }

    /// Build a validated [`RetryPolicy`].
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let maximum_interval = (self.maximum_interval_ms != 0)
            .then(|| Duration::from_millis(self.maximum_interval_ms));
        let maximum_attempts = (self.maximum_attempts != 0).then_some(self.maximum_attempts);

        let policy = RetryPolicy::new(Duration::from_millis(self.initial_interval_ms))
            .with_backoff_coefficient(self.backoff_coefficient)
            .with_maximum_interval(maximum_interval)
            .with_expiration_interval(Duration::from_millis(self.expiration_interval_ms))
            .with_jitter(self.jitter)
            .with_maximum_attempts(maximum_attempts);

        policy.validate()?;
        Ok(policy)
    }

    /// A fresh exclude-internal flag initialized from this configuration.
    pub fn exclude_internal_flag(&self) -> ExcludeInternalFlag {
        ExcludeInternalFlag::new(self.exclude_internal_errors)
    }
}

/// Fails when a duration is not a whole number of milliseconds or does not
/// fit in `u64` milliseconds, so the result always converts back to an equal
/// policy.
impl TryFrom<&RetryPolicy> for RetryConfig {
    type Error = ConfigError;

    fn try_from(policy: &RetryPolicy) -> Result<Self, Self::Error> {
        let maximum_interval_ms = match policy.maximum_interval() {
            Some(maximum) => exact_millis("maximum_interval", maximum)?,
            None => 0,
        };

        Ok(Self {
            initial_interval_ms: exact_millis("initial_interval", policy.initial_interval())?,
            backoff_coefficient: policy.backoff_coefficient(),
            maximum_interval_ms,
            expiration_interval_ms: exact_millis(
                "expiration_interval",
                policy.expiration_interval(),
            )?,
            jitter: policy.jitter(),
            maximum_attempts: policy.maximum_attempts().unwrap_or(0),
            exclude_internal_errors: false,
        })
    }
}

fn env_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { var, value }),
        Err(_) => Ok(None),
    }
}

fn env_flag(var: &'static str) -> Result<Option<bool>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidVar { var, value }),
        },
        Err(_) => Ok(None),
    }
}
