//! Retry decisions derived from a [`RetryPolicy`].
//!
//! All functions here are pure given `(policy, attempt, code)`, apart from the
//! jitter draw. They never block and never fail.
//!
//! # Delay formula
//!
//! For retry `n` (0-indexed: the first retry uses `n = 0`):
//! ```text
//! raw    = initial_interval * backoff_coefficient ^ n
//! capped = min(raw, maximum_interval or MAX_DELAY)
//! delay  = uniform(capped * (1 - jitter), capped * (1 + jitter))
//! ```
//! Non-finite or out-of-range products saturate at the cap.

use super::exclusion::ExcludeInternalFlag;
use super::jitter::apply_jitter;
use super::policy::RetryPolicy;
use crate::code::{Code, RetryableCodes};
use std::time::Duration;

/// Ceiling on a raw delay when the policy has no maximum interval.
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Delay before retry `attempt`, before jitter.
///
/// Saturates at the policy's maximum interval (or [`MAX_DELAY`] when it is
/// unbounded) instead of overflowing, for any `attempt`.
///
/// # Examples
///
/// ```rust
/// use callretry_core::retry::{RetryPolicy, raw_delay_for_attempt};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(Duration::from_millis(100));
/// assert_eq!(raw_delay_for_attempt(&policy, 3), Duration::from_millis(800));
/// assert_eq!(raw_delay_for_attempt(&policy, u32::MAX), Duration::from_secs(10));
/// ```
pub fn raw_delay_for_attempt(policy: &RetryPolicy, attempt: u32) -> Duration {
    let ceiling = policy.maximum_interval().unwrap_or(MAX_DELAY);

    let exponent = attempt.min(i32::MAX as u32) as i32;
    let nanos =
        policy.initial_interval().as_nanos() as f64 * policy.backoff_coefficient().powi(exponent);

    if !nanos.is_finite() || nanos < 0.0 || nanos >= ceiling.as_nanos() as f64 {
        ceiling
    } else {
        Duration::from_nanos(nanos as u64)
    }
}

/// Delay before retry `attempt`, with the policy's jitter applied.
pub fn delay_for_attempt(policy: &RetryPolicy, attempt: u32) -> Duration {
    apply_jitter(raw_delay_for_attempt(policy, attempt), policy.jitter())
}

/// Whether another attempt may be issued after `attempts_made` attempts.
///
/// With unlimited attempts this is always `true`; the deadline is then the
/// only stopping condition.
pub fn attempt_permitted(policy: &RetryPolicy, attempts_made: u32) -> bool {
    match policy.maximum_attempts() {
        Some(maximum) => attempts_made < maximum,
        None => true,
    }
}

/// Whether a failure with `code` should be retried.
///
/// Without a policy the answer is always `false`: absence of configuration
/// opts the call out of retries.
pub fn is_retryable(policy: Option<&RetryPolicy>, code: Code, exclude_internal: bool) -> bool {
    policy.is_some() && RetryableCodes::for_exclusion(exclude_internal).contains(code)
}

/// Whether `code` is in the full retryable set, regardless of any policy.
pub fn is_status_code_retryable(code: Code) -> bool {
    RetryableCodes::All.contains(code)
}

/// Retry decisions for one logical call.
///
/// Borrows the call's policy (if any) and captures the exclude-internal toggle
/// once, at construction. Cheap to build; create one per call.
#[derive(Debug, Clone, Copy)]
pub struct RetryDecider<'a> {
    policy: Option<&'a RetryPolicy>,
    retryable: RetryableCodes,
}

impl<'a> RetryDecider<'a> {
    /// Create a decider with an explicit exclude-internal value.
    pub fn new(policy: Option<&'a RetryPolicy>, exclude_internal: bool) -> Self {
        Self {
            policy,
            retryable: RetryableCodes::for_exclusion(exclude_internal),
        }
    }

    /// Create a decider reading the shared flag's current value.
    pub fn from_flag(policy: Option<&'a RetryPolicy>, flag: &ExcludeInternalFlag) -> Self {
        Self::new(policy, flag.is_enabled())
    }

    /// The policy this decider reads, if any.
    pub fn policy(&self) -> Option<&'a RetryPolicy> {
        self.policy
    }

    /// Whether retries are enabled at all for this call.
    pub fn is_enabled(&self) -> bool {
        self.policy.is_some()
    }

    /// The retryable set selected for this call.
    pub fn retryable_codes(&self) -> RetryableCodes {
        self.retryable
    }

    /// Jittered delay before retry `attempt`; zero without a policy.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.policy
            .map(|policy| delay_for_attempt(policy, attempt))
            .unwrap_or(Duration::ZERO)
    }

    /// Whether another attempt may follow `attempts_made` attempts.
    ///
    /// Without a policy only the original attempt is permitted.
    pub fn attempt_permitted(&self, attempts_made: u32) -> bool {
        match self.policy {
            Some(policy) => attempt_permitted(policy, attempts_made),
            None => attempts_made == 0,
        }
    }

    /// Whether a failure with `code` should be retried.
    pub fn is_retryable(&self, code: Code) -> bool {
        self.policy.is_some() && self.retryable.contains(code)
    }
}
