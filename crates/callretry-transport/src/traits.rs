//! Invoker trait and per-call request types
//!
//! Defines the single-attempt [`UnaryInvoker`] interface that a concrete
//! transport implements, and the [`CallRequest`] that carries a payload
//! together with its retry options.

use crate::error::Status;
use async_trait::async_trait;
use callretry_core::deadline::CallOptions;
use callretry_core::retry::RetryPolicy;
use std::time::{Duration, Instant};

/// What one attempt of a call sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptContext {
    /// Fully qualified method name
    pub method: String,

    /// Zero-based attempt index (0 is the original try)
    pub attempt: u32,

    /// Effective deadline of the logical call, if any
    pub deadline: Option<Instant>,
}

/// Executes a single attempt of a unary call.
///
/// Implementations open connections, serialize the request and map transport
/// failures to a [`Status`]. They never retry; that is the job of
/// [`RetryingInvoker`](crate::RetryingInvoker).
#[async_trait]
pub trait UnaryInvoker: Send + Sync {
    /// Request payload type
    type Request: Send + Sync;

    /// Response type
    type Response: Send;

    /// Issue one attempt.
    async fn invoke(
        &self,
        ctx: &AttemptContext,
        request: &Self::Request,
    ) -> Result<Self::Response, Status>;
}

/// A logical call: method, payload and retry options
///
/// # Examples
///
/// ```rust
/// use callretry_transport::CallRequest;
/// use callretry_core::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let request = CallRequest::new("/store.Store/Get", "key-1")
///     .with_retry_policy(RetryPolicy::new(Duration::from_millis(100)));
///
/// assert!(request.options.retry_policy.is_some());
/// assert!(request.options.deadline.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CallRequest<T> {
    /// Fully qualified method name
    pub method: String,

    /// Request payload
    pub payload: T,

    /// Retry policy and caller deadline
    pub options: CallOptions,
}

impl<T> CallRequest<T> {
    /// Create a request with no retry policy and no deadline
    pub fn new(method: impl Into<String>, payload: T) -> Self {
        Self {
            method: method.into(),
            payload,
            options: CallOptions::default(),
        }
    }

    /// Attach a retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.options.retry_policy = Some(policy);
        self
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.options.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to the runtime clock's current time
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let now = tokio::time::Instant::now().into_std();
        self.with_deadline(now + timeout)
    }

    /// Replace all options at once
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let deadline = Instant::now() + Duration::from_secs(1);
        let request = CallRequest::new("/svc/Method", 7u32)
            .with_retry_policy(RetryPolicy::new(Duration::from_millis(10)))
            .with_deadline(deadline);

        assert_eq!(request.method, "/svc/Method");
        assert_eq!(request.payload, 7);
        assert_eq!(request.options.deadline, Some(deadline));
        assert_eq!(
            request.options.retry_policy.map(|p| p.initial_interval()),
            Some(Duration::from_millis(10))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_uses_runtime_clock() {
        let now = tokio::time::Instant::now().into_std();
        let request = CallRequest::new("/svc/Method", ()).with_timeout(Duration::from_secs(3));

        assert_eq!(request.options.deadline, Some(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_with_options_replaces() {
        let request = CallRequest::new("/svc/Method", ())
            .with_retry_policy(RetryPolicy::new(Duration::from_millis(10)))
            .with_options(CallOptions::new());

        assert_eq!(request.options, CallOptions::new());
    }
}
