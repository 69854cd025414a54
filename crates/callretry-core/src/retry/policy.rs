//! Retry parameters for one logical call.

use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default multiplier applied to the delay after each attempt.
pub const DEFAULT_BACKOFF_COEFFICIENT: f64 = 2.0;
/// Default ceiling on a single computed delay.
pub const DEFAULT_MAXIMUM_INTERVAL: Option<Duration> = Some(Duration::from_secs(10));
/// Default budget for the whole retry sequence when the caller set no deadline.
pub const DEFAULT_EXPIRATION_INTERVAL: Duration = Duration::from_secs(60);
/// Default symmetric randomization of each delay (±20%).
pub const DEFAULT_JITTER: f64 = 0.2;
/// Default cap on total attempts (`None` = unlimited).
pub const DEFAULT_MAXIMUM_ATTEMPTS: Option<u32> = None;

/// Backoff, jitter and cap parameters for one logical call.
///
/// Built once per call, configured with the `set_*`/`with_*` methods, then
/// only read. Construction never fails: out-of-range values are a caller
/// precondition, checked on demand by [`RetryPolicy::validate`].
///
/// Sentinels are modelled with `Option`:
/// - `maximum_interval == None` means delays are not clamped
/// - `maximum_attempts == None` means attempts are bounded only by the deadline
///
/// # Examples
///
/// ```rust
/// use callretry_core::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(Duration::from_millis(100))
///     .with_backoff_coefficient(1.5)
///     .with_maximum_attempts(Some(5));
///
/// assert_eq!(policy.maximum_interval(), Some(Duration::from_secs(10)));
/// assert_eq!(policy.jitter(), 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    initial_interval: Duration,
    backoff_coefficient: f64,
    maximum_interval: Option<Duration>,
    expiration_interval: Duration,
    jitter: f64,
    maximum_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Create a policy with the given initial interval and defaults elsewhere.
    ///
    /// Defaults:
    /// - `backoff_coefficient`: 2.0
    /// - `maximum_interval`: 10s
    /// - `expiration_interval`: 60s
    /// - `jitter`: 0.2
    /// - `maximum_attempts`: unlimited
    pub fn new(initial_interval: Duration) -> Self {
        Self {
            initial_interval,
            backoff_coefficient: DEFAULT_BACKOFF_COEFFICIENT,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            expiration_interval: DEFAULT_EXPIRATION_INTERVAL,
            jitter: DEFAULT_JITTER,
            maximum_attempts: DEFAULT_MAXIMUM_ATTEMPTS,
        }
    }

    /// Delay before the first retry.
    pub fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    /// Multiplier applied per attempt.
    pub fn backoff_coefficient(&self) -> f64 {
        self.backoff_coefficient
    }

    /// Ceiling on a computed delay, `None` when unbounded.
    pub fn maximum_interval(&self) -> Option<Duration> {
        self.maximum_interval
    }

    /// Budget for the whole retry sequence.
    ///
    /// Ignored when the call already carries a deadline.
    pub fn expiration_interval(&self) -> Duration {
        self.expiration_interval
    }

    /// Fraction of each delay used for symmetric randomization.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Cap on total attempts, `None` when unlimited.
    pub fn maximum_attempts(&self) -> Option<u32> {
        self.maximum_attempts
    }

    /// Set the delay before the first retry.
    pub fn set_initial_interval(&mut self, initial_interval: Duration) {
        self.initial_interval = initial_interval;
    }

    /// Set the rate at which delays grow.
    pub fn set_backoff_coefficient(&mut self, backoff_coefficient: f64) {
        self.backoff_coefficient = backoff_coefficient;
    }

    /// Set the maximum delay between attempts (`None` for unbounded).
    pub fn set_maximum_interval(&mut self, maximum_interval: Option<Duration>) {
        self.maximum_interval = maximum_interval;
    }

    /// Set the total time that can be spent on all attempts.
    ///
    /// Ignored when the call carries its own deadline.
    pub fn set_expiration_interval(&mut self, expiration_interval: Duration) {
        self.expiration_interval = expiration_interval;
    }

    /// Set the randomization of each delay, e.g. 0.2 means ±20%.
    pub fn set_jitter(&mut self, jitter: f64) {
        self.jitter = jitter;
    }

    /// Set the cap on total attempts (`None` for unlimited).
    pub fn set_maximum_attempts(&mut self, maximum_attempts: Option<u32>) {
        self.maximum_attempts = maximum_attempts;
    }

    /// Builder-style [`set_backoff_coefficient`](Self::set_backoff_coefficient).
    pub fn with_backoff_coefficient(mut self, backoff_coefficient: f64) -> Self {
        self.set_backoff_coefficient(backoff_coefficient);
        self
    }

    /// Builder-style [`set_maximum_interval`](Self::set_maximum_interval).
    pub fn with_maximum_interval(mut self, maximum_interval: Option<Duration>) -> Self {
        self.set_maximum_interval(maximum_interval);
        self
    }

    /// Builder-style [`set_expiration_interval`](Self::set_expiration_interval).
    pub fn with_expiration_interval(mut self, expiration_interval: Duration) -> Self {
        self.set_expiration_interval(expiration_interval);
        self
    }

    /// Builder-style [`set_jitter`](Self::set_jitter).
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.set_jitter(jitter);
        self
    }

    /// Builder-style [`set_maximum_attempts`](Self::set_maximum_attempts).
    pub fn with_maximum_attempts(mut self, maximum_attempts: Option<u32>) -> Self {
        self.set_maximum_attempts(maximum_attempts);
        self
    }

    /// Unlimited attempts combined with an unbounded interval.
    ///
    /// Such a sequence is bounded only by its deadline, and its delays can
    /// grow until they reach [`MAX_DELAY`](crate::retry::MAX_DELAY).
    pub fn is_unbounded(&self) -> bool {
        self.maximum_attempts.is_none() && self.maximum_interval.is_none()
    }

    /// Check every parameter against its documented range.
    ///
    /// An [unbounded](Self::is_unbounded) policy is accepted but logged.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.initial_interval.is_zero() {
            return Err(PolicyError::ZeroInitialInterval);
        }
        if self.expiration_interval.is_zero() {
            return Err(PolicyError::ZeroExpirationInterval);
        }
        if !self.backoff_coefficient.is_finite() || self.backoff_coefficient < 1.0 {
            return Err(PolicyError::InvalidBackoffCoefficient(
                self.backoff_coefficient,
            ));
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(PolicyError::InvalidJitter(self.jitter));
        }
        if self.maximum_attempts == Some(0) {
            return Err(PolicyError::ZeroMaximumAttempts);
        }

        #[cfg(feature = "tracing")]
        {
            if self.is_unbounded() {
                tracing::warn!(
                    initial_interval_ms = saturating_millis(self.initial_interval),
                    expiration_interval_ms = saturating_millis(self.expiration_interval),
                    "retry policy has unlimited attempts and no maximum interval"
                );
            }
        }

        Ok(())
    }
}

#[cfg(feature = "tracing")]
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_defaults() {
        let policy = RetryPolicy::new(Duration::from_millis(250));

        assert_eq!(policy.initial_interval(), Duration::from_millis(250));
        assert_eq!(policy.backoff_coefficient(), 2.0);
        assert_eq!(policy.maximum_interval(), Some(Duration::from_secs(10)));
        assert_eq!(policy.expiration_interval(), Duration::from_secs(60));
        assert_eq!(policy.jitter(), 0.2);
        assert_eq!(policy.maximum_attempts(), None);
    }

    #[test]
    fn test_setters_mutate_in_place() {
        let mut policy = RetryPolicy::new(Duration::from_millis(1));
        policy.set_initial_interval(Duration::from_millis(5));
        policy.set_backoff_coefficient(3.0);
        policy.set_maximum_interval(None);
        policy.set_expiration_interval(Duration::from_secs(5));
        policy.set_jitter(0.0);
        policy.set_maximum_attempts(Some(7));

        assert_eq!(policy.initial_interval(), Duration::from_millis(5));
        assert_eq!(policy.backoff_coefficient(), 3.0);
        assert_eq!(policy.maximum_interval(), None);
        assert_eq!(policy.expiration_interval(), Duration::from_secs(5));
        assert_eq!(policy.jitter(), 0.0);
        assert_eq!(policy.maximum_attempts(), Some(7));
    }

    #[test]
    fn test_builder_style_matches_setters() {
        let built = RetryPolicy::new(Duration::from_millis(100))
            .with_backoff_coefficient(1.5)
            .with_maximum_interval(Some(Duration::from_secs(2)))
            .with_expiration_interval(Duration::from_secs(30))
            .with_jitter(0.1)
            .with_maximum_attempts(Some(4));

        let mut set = RetryPolicy::new(Duration::from_millis(100));
        set.set_backoff_coefficient(1.5);
        set.set_maximum_interval(Some(Duration::from_secs(2)));
        set.set_expiration_interval(Duration::from_secs(30));
        set.set_jitter(0.1);
        set.set_maximum_attempts(Some(4));

        assert_eq!(built, set);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(RetryPolicy::new(Duration::from_millis(1)).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let base = RetryPolicy::new(Duration::from_millis(100));

        assert_eq!(
            RetryPolicy::new(Duration::ZERO).validate(),
            Err(PolicyError::ZeroInitialInterval)
        );
        assert_eq!(
            base.clone()
                .with_expiration_interval(Duration::ZERO)
                .validate(),
            Err(PolicyError::ZeroExpirationInterval)
        );
        assert_eq!(
            base.clone().with_backoff_coefficient(0.5).validate(),
            Err(PolicyError::InvalidBackoffCoefficient(0.5))
        );
        assert!(matches!(
            base.clone().with_backoff_coefficient(f64::NAN).validate(),
            Err(PolicyError::InvalidBackoffCoefficient(_))
        ));
        assert_eq!(
            base.clone().with_jitter(1.0).validate(),
            Err(PolicyError::InvalidJitter(1.0))
        );
        assert_eq!(
            base.clone().with_jitter(-0.1).validate(),
            Err(PolicyError::InvalidJitter(-0.1))
        );
        assert_eq!(
            base.with_maximum_attempts(Some(0)).validate(),
            Err(PolicyError::ZeroMaximumAttempts)
        );
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_log_millis_saturate() {
        assert_eq!(saturating_millis(Duration::from_micros(2_500)), 2);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_unbounded_policy_is_flagged_not_rejected() {
        let policy = RetryPolicy::new(Duration::from_millis(100)).with_maximum_interval(None);
        assert!(policy.is_unbounded());
        assert!(policy.validate().is_ok());

        let capped = policy.with_maximum_attempts(Some(3));
        assert!(!capped.is_unbounded());
    }
}
