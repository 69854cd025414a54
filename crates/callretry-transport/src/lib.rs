//! Retrying execution of unary calls
//!
//! Wraps a single-attempt [`UnaryInvoker`] and drives the attempt loop using
//! the decisions made by `callretry-core`.
//!
//! # Architecture
//!
//! - **UnaryInvoker trait**: one attempt, implemented by a concrete transport
//! - **RetryInterceptor**: resolves policy, deadline and exclusion flag per call

#![deny(unsafe_code)]
#![warn(missing_docs)]
//! - **RetryingInvoker**: the loop that sleeps, retries and gives up
//!
//! # Usage
//!
//! ```ignore
//! use callretry_transport::{CallRequest, RetryInterceptor, RetryingInvoker};
//! use callretry_core::retry::{ExcludeInternalFlag, RetryPolicy};
//!
//! let flag = ExcludeInternalFlag::new(false);
//! let invoker = RetryingInvoker::new(my_transport, RetryInterceptor::new(flag));
//! let request = CallRequest::new("/store.Store/Get", key)
//!     .with_retry_policy(RetryPolicy::new(Duration::from_millis(100)));
//! let response = invoker.call(&request, &CancellationToken::new()).await?;
//! ```

pub mod error;
pub mod interceptor;
pub mod retrying;
pub mod traits;

// Re-export commonly used types
pub use error::{CallError, Result, Status};
pub use interceptor::{RetryInterceptor, RetryPlan};
pub use retrying::RetryingInvoker;
pub use traits::{AttemptContext, CallRequest, UnaryInvoker};
