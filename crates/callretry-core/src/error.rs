//! Error types for policy validation and configuration loading.
//!
//! Retry decisions themselves never fail; only turning untrusted configuration
//! into a [`RetryPolicy`](crate::retry::RetryPolicy) can.

use std::time::Duration;
use thiserror::Error;

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Policy parameters are out of range.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Configuration could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A retry policy parameter is outside its documented range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// `initial_interval` must be greater than zero.
    #[error("initial interval must be positive")]
    ZeroInitialInterval,

    /// `expiration_interval` must be greater than zero.
    #[error("expiration interval must be positive")]
    ZeroExpirationInterval,

    /// `backoff_coefficient` must be finite and at least 1.0.
    #[error("backoff coefficient must be finite and >= 1.0, got {0}")]
    InvalidBackoffCoefficient(f64),

    /// `jitter` must lie in `[0, 1)`.
    #[error("jitter must be in [0, 1), got {0}")]
    InvalidJitter(f64),

    /// `maximum_attempts` must be positive when set.
    #[error("maximum attempts must be positive when set")]
    ZeroMaximumAttempts,
}

/// Failure while loading a [`RetryConfig`](crate::config::RetryConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML document could not be parsed.
    #[error("invalid TOML retry config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON document could not be parsed.
    #[error("invalid JSON retry config: {0}")]
    Json(#[from] serde_json::Error),

    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable holds a value that does not parse.
    #[error("invalid value {value:?} for environment variable {var}")]
    InvalidVar {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },

    /// A policy duration has no exact whole-millisecond representation.
    #[error("{field} of {duration:?} is not a whole number of milliseconds within range")]
    UnrepresentableDuration {
        /// Policy field name.
        field: &'static str,
        /// Offending duration.
        duration: Duration,
    },

    /// The parsed values do not form a valid policy.
    #[error("invalid retry policy: {0}")]
    Policy(#[from] PolicyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_error_messages() {
        assert_eq!(
            PolicyError::InvalidJitter(1.5).to_string(),
            "jitter must be in [0, 1), got 1.5"
        );
        assert_eq!(
            PolicyError::ZeroInitialInterval.to_string(),
            "initial interval must be positive"
        );
    }

    #[test]
    fn test_config_error_wraps_policy_error() {
        let err: ConfigError = PolicyError::ZeroMaximumAttempts.into();
        assert!(matches!(err, ConfigError::Policy(PolicyError::ZeroMaximumAttempts)));

        let top: Error = err.into();
        assert_eq!(
            top.to_string(),
            "invalid retry policy: maximum attempts must be positive when set"
        );
    }

    #[test]
    fn test_unrepresentable_duration_message() {
        let err = ConfigError::UnrepresentableDuration {
            field: "initial_interval",
            duration: Duration::from_micros(500),
        };
        assert_eq!(
            err.to_string(),
            "initial_interval of 500µs is not a whole number of milliseconds within range"
        );
    }

    #[test]
    fn test_invalid_var_message() {
        let err = ConfigError::InvalidVar {
            var: "CALLRETRY_JITTER",
            value: "lots".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"lots\" for environment variable CALLRETRY_JITTER"
        );
    }
}
