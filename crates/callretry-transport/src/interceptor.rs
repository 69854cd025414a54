//! Turns a call's options into a retry plan
//!
//! The interceptor is where the process-wide exclude-internal flag is read:
//! once per call, when the plan is built. Calls already past that point keep
//! the value they saw.

use callretry_core::deadline::{CallOptions, DeadlineScope};
use callretry_core::retry::{ExcludeInternalFlag, RetryDecider};
use std::time::Instant;

/// Builds a [`RetryPlan`] for each call
///
/// # Examples
///
/// ```rust
/// use callretry_transport::RetryInterceptor;
/// use callretry_core::deadline::CallOptions;
/// use callretry_core::retry::{ExcludeInternalFlag, RetryPolicy};
/// use callretry_core::Code;
/// use std::time::{Duration, Instant};
///
/// let flag = ExcludeInternalFlag::new(true);
/// let interceptor = RetryInterceptor::new(flag);
///
/// let options = CallOptions::new().with_retry_policy(RetryPolicy::new(Duration::from_millis(100)));
/// let plan = interceptor.plan(&options, Instant::now());
///
/// assert!(plan.decider().is_retryable(Code::Unavailable));
/// assert!(!plan.decider().is_retryable(Code::Internal));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RetryInterceptor {
    exclude_internal: ExcludeInternalFlag,
}

impl RetryInterceptor {
    /// Create an interceptor reading the given shared flag
    pub fn new(exclude_internal: ExcludeInternalFlag) -> Self {
        Self { exclude_internal }
    }

    /// The shared flag, e.g. for an admin endpoint to toggle
    pub fn exclude_internal(&self) -> &ExcludeInternalFlag {
        &self.exclude_internal
    }

    /// Resolve decisions and deadline for a call starting at `now`
    pub fn plan<'a>(&self, options: &'a CallOptions, now: Instant) -> RetryPlan<'a> {
        RetryPlan {
            decider: RetryDecider::from_flag(options.retry_policy.as_ref(), &self.exclude_internal),
            scope: DeadlineScope::enter(options, now),
        }
    }
}

/// Decisions and deadline for one logical call
///
/// Dropping the plan releases any deadline injected from the policy.
#[derive(Debug)]
pub struct RetryPlan<'a> {
    decider: RetryDecider<'a>,
    scope: Option<DeadlineScope>,
}

impl<'a> RetryPlan<'a> {
    /// Per-call retry decisions
    pub fn decider(&self) -> RetryDecider<'a> {
        self.decider
    }

    /// Whether failed attempts may be retried at all
    pub fn is_enabled(&self) -> bool {
        self.decider.is_enabled()
    }

    /// Deadline scope, absent when neither caller nor policy bounds the call
    pub fn scope(&self) -> Option<&DeadlineScope> {
        self.scope.as_ref()
    }

    /// Effective absolute deadline
    pub fn deadline(&self) -> Option<Instant> {
        self.scope.as_ref().map(DeadlineScope::deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callretry_core::Code;
    use callretry_core::deadline::DeadlineSource;
    use callretry_core::retry::RetryPolicy;
    use std::time::Duration;

    #[test]
    fn test_plan_without_policy_is_disabled() {
        let interceptor = RetryInterceptor::default();
        let options = CallOptions::new();
        let plan = interceptor.plan(&options, Instant::now());

        assert!(!plan.is_enabled());
        assert!(plan.deadline().is_none());
        for code in Code::ALL {
            assert!(!plan.decider().is_retryable(code));
        }
    }

    #[test]
    fn test_plan_injects_policy_deadline() {
        let now = Instant::now();
        let options = CallOptions::new().with_retry_policy(
            RetryPolicy::new(Duration::from_millis(100))
                .with_expiration_interval(Duration::from_secs(2)),
        );
        let plan = RetryInterceptor::default().plan(&options, now);

        assert!(plan.is_enabled());
        assert_eq!(plan.deadline(), Some(now + Duration::from_secs(2)));
        assert_eq!(plan.scope().map(DeadlineScope::source), Some(DeadlineSource::Policy));
    }

    #[test]
    fn test_plan_keeps_caller_deadline() {
        let now = Instant::now();
        let caller = now + Duration::from_millis(300);
        let options = CallOptions::new()
            .with_retry_policy(
                RetryPolicy::new(Duration::from_millis(100))
                    .with_expiration_interval(Duration::from_secs(60)),
            )
            .with_deadline(caller);

        let plan = RetryInterceptor::default().plan(&options, now);
        assert_eq!(plan.deadline(), Some(caller));
    }

    #[test]
    fn test_flag_read_at_plan_time() {
        let flag = ExcludeInternalFlag::new(false);
        let interceptor = RetryInterceptor::new(flag.clone());
        let options =
            CallOptions::new().with_retry_policy(RetryPolicy::new(Duration::from_millis(1)));

        let before = interceptor.plan(&options, Instant::now());
        flag.enable();
        let after = interceptor.plan(&options, Instant::now());

        assert!(before.decider().is_retryable(Code::Internal));
        assert!(!after.decider().is_retryable(Code::Internal));
        assert!(interceptor.exclude_internal().is_enabled());
    }
}
