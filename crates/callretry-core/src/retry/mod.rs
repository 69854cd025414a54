//! Retry policy and the decisions derived from it.
//!
//! # Key Types
//!
//! - [`RetryPolicy`] - per-call backoff, jitter and cap parameters
//! - [`RetryDecider`] - per-call view that answers "how long", "again?" and
//!   "is this failure retryable?"
//! - [`ExcludeInternalFlag`] - process-wide toggle removing `INTERNAL` from
//!   the retryable set
//!
//! # Examples
//!
//! ```rust
//! use callretry_core::retry::{RetryDecider, RetryPolicy, ExcludeInternalFlag};
//! use callretry_core::Code;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(Duration::from_millis(50)).with_maximum_attempts(Some(3));
//! let flag = ExcludeInternalFlag::new(true);
//!
//! let decider = RetryDecider::from_flag(Some(&policy), &flag);
//! assert!(!decider.is_retryable(Code::Internal));
//! assert!(decider.attempt_permitted(2));
//! assert!(!decider.attempt_permitted(3));
//! ```

mod decider;
mod exclusion;
mod jitter;
mod policy;


pub use decider::{
    MAX_DELAY, RetryDecider, attempt_permitted, delay_for_attempt, is_retryable,
    is_status_code_retryable, raw_delay_for_attempt,
};
pub use exclusion::ExcludeInternalFlag;
pub use jitter::apply_jitter;
pub use policy::{
    DEFAULT_BACKOFF_COEFFICIENT, DEFAULT_EXPIRATION_INTERVAL, DEFAULT_JITTER,
    DEFAULT_MAXIMUM_ATTEMPTS, DEFAULT_MAXIMUM_INTERVAL, RetryPolicy,
};
