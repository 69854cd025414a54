//! Per-call options and deadline injection.
//!
//! [`CallOptions`] is the explicit per-call carrier for the retry policy and
//! the caller's absolute deadline. [`DeadlineScope`] resolves the deadline
//! that actually bounds a call:
//!
//! - a caller deadline always wins, and the policy's expiration is ignored
//! - otherwise, with a policy, the deadline is `now + expiration_interval`
//! - with neither, the call has no deadline
//!
//! The scope owns an injected deadline for exactly one logical call and is
//! released when the call finishes, whatever its outcome.

use crate::retry::RetryPolicy;
use std::time::{Duration, Instant};

/// Horizon used when `now + expiration_interval` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Retry configuration and deadline attached to one call.
///
/// # Examples
///
/// ```rust
/// use callretry_core::deadline::CallOptions;
/// use callretry_core::retry::RetryPolicy;
/// use std::time::{Duration, Instant};
///
/// let options = CallOptions::new()
///     .with_retry_policy(RetryPolicy::new(Duration::from_millis(100)))
///     .with_deadline(Instant::now() + Duration::from_secs(5));
///
/// assert!(options.retry_policy.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    /// Retry policy; `None` disables retries for this call.
    pub retry_policy: Option<RetryPolicy>,

    /// Absolute deadline set by the caller.
    pub deadline: Option<Instant>,
}

impl CallOptions {
    /// Options with no policy and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Set the caller's absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Where an effective deadline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineSource {
    /// Set by the caller; never altered by the retry policy.
    Caller,
    /// Injected from the policy's expiration interval.
    Policy,
}

/// The deadline bounding a call, with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveDeadline {
    /// Absolute expiry.
    pub at: Instant,
    /// Origin of the deadline.
    pub source: DeadlineSource,
}

/// Deadline held for the lifetime of one logical call.
#[derive(Debug)]
pub struct DeadlineScope {
    effective: EffectiveDeadline,
}

impl DeadlineScope {
    /// Resolve the deadline for a call starting at `now`.
    ///
    /// Returns `None` when neither the caller nor a policy bounds the call.
    pub fn enter(options: &CallOptions, now: Instant) -> Option<Self> {
        let effective = match (options.deadline, options.retry_policy.as_ref()) {
            (Some(at), _) => EffectiveDeadline {
                at,
                source: DeadlineSource::Caller,
            },
            (None, Some(policy)) => EffectiveDeadline {
                at: inject(now, policy.expiration_interval()),
                source: DeadlineSource::Policy,
            },
            (None, None) => return None,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            source = ?effective.source,
            remaining_ms = u64::try_from(effective.at.saturating_duration_since(now).as_millis())
                .unwrap_or(u64::MAX),
            "deadline scope entered"
        );

        Some(Self { effective })
    }

    /// The resolved deadline.
    pub fn effective(&self) -> EffectiveDeadline {
        self.effective
    }

    /// Absolute expiry.
    pub fn deadline(&self) -> Instant {
        self.effective.at
    }

    /// Origin of the deadline.
    pub fn source(&self) -> DeadlineSource {
        self.effective.source
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.effective.at.saturating_duration_since(now)
    }

    /// Whether the deadline has passed at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.effective.at
    }
}

impl Drop for DeadlineScope {
    fn drop(&mut self) {
        #[cfg(feature = "tracing")]
        {
            if self.effective.source == DeadlineSource::Policy {
                tracing::trace!("injected deadline released");
            }
        }
    }
}

fn inject(now: Instant, expiration: Duration) -> Instant {
    now.checked_add(expiration).unwrap_or_else(|| now + FAR_FUTURE)
}
