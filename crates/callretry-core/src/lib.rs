#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry policy engine for unary RPC calls.
//!
//! This crate decides, for one logical call, whether a failed attempt should
//! be retried, how long to wait first, and when to give up. It never sleeps or
//! performs I/O itself; an execution loop (see `callretry-transport`) asks it
//! for decisions and does the waiting.
//!
//! - **Backoff**: `initial_interval * backoff_coefficient^attempt`, clamped to
//!   `maximum_interval`, saturating instead of overflowing
//! - **Jitter**: symmetric `±jitter` randomization from a thread-local source
//! - **Deadlines**: a caller deadline always wins; otherwise the policy's
//!   expiration interval bounds the whole sequence
//! - **Classification**: a closed set of retryable [`Code`]s, with a reduced
//!   set that leaves out `INTERNAL` when the process-wide flag asks for it
//!
//! # Examples
//!
//! ```rust
//! use callretry_core::prelude::*;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(Duration::from_millis(100))
//!     .with_maximum_interval(Some(Duration::from_secs(1)))
//!     .with_jitter(0.0);
//!
//! let decider = RetryDecider::new(Some(&policy), false);
//! assert_eq!(decider.delay_for_attempt(0), Duration::from_millis(100));
//! assert_eq!(decider.delay_for_attempt(4), Duration::from_secs(1));
//! assert!(decider.is_retryable(Code::Unavailable));
//! assert!(!decider.is_retryable(Code::DeadlineExceeded));
//! ```

pub mod code;
pub mod config;
pub mod deadline;
pub mod error;
pub mod retry;

pub use code::{Code, RetryableCodes};
pub use error::{ConfigError, Error, PolicyError, Result};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use callretry_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::code::{Code, RetryableCodes};
    pub use crate::config::RetryConfig;
    pub use crate::deadline::{CallOptions, DeadlineScope, DeadlineSource, EffectiveDeadline};
    pub use crate::retry::{ExcludeInternalFlag, RetryDecider, RetryPolicy};
}
