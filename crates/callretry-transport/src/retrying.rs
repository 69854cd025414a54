//! Retrying execution loop over a [`UnaryInvoker`]
//!
//! ```text
//! plan = interceptor.plan(options, now)
//! loop {
//!   ├─► deadline passed?            ─► DeadlineExceeded
//!   ├─► invoke attempt (bounded by deadline, cancellable)
//!   │       ├─ Ok                    ─► return response
//!   │       ├─ timed out             ─► DeadlineExceeded
//!   │       └─ Err(status)
//!   │            ├─ not retryable    ─► Status (unchanged)
//!   │            ├─ cap reached      ─► AttemptsExhausted
//!   │            ├─ delay crosses deadline ─► DeadlineExceeded
//!   │            └─ sleep(delay) (cancellable), continue
//! }
//! ```

use crate::error::{CallError, Result, Status};
use crate::interceptor::RetryInterceptor;
use crate::traits::{AttemptContext, CallRequest, UnaryInvoker};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Wraps an invoker and retries failed attempts according to each call's policy
///
/// # Examples
///
/// ```rust
/// use callretry_transport::{AttemptContext, CallRequest, RetryingInvoker, Status, UnaryInvoker};
/// use callretry_core::retry::RetryPolicy;
/// use async_trait::async_trait;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// struct Echo;
///
/// #[async_trait]
/// impl UnaryInvoker for Echo {
///     type Request = String;
///     type Response = String;
///
///     async fn invoke(&self, _ctx: &AttemptContext, request: &String) -> Result<String, Status> {
///         Ok(request.clone())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let invoker = RetryingInvoker::new(Echo, Default::default());
/// let request = CallRequest::new("/echo.Echo/Say", "hi".to_string())
///     .with_retry_policy(RetryPolicy::new(Duration::from_millis(100)));
///
/// let reply = invoker.call(&request, &CancellationToken::new()).await.unwrap();
/// assert_eq!(reply, "hi");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryingInvoker<I> {
    inner: I,
    interceptor: RetryInterceptor,
}

impl<I: UnaryInvoker> RetryingInvoker<I> {
    /// Wrap `inner`, classifying failures with `interceptor`'s flag
    pub fn new(inner: I, interceptor: RetryInterceptor) -> Self {
        Self { inner, interceptor }
    }

    /// The wrapped invoker
    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// The interceptor building each call's plan
    pub fn interceptor(&self) -> &RetryInterceptor {
        &self.interceptor
    }

    /// Execute a logical call, retrying as its options allow.
    ///
    /// Cancelling `cancel` aborts the call at once, whether an attempt is in
    /// flight or the loop is waiting to retry; no further decisions are made.
    #[tracing::instrument(skip_all, fields(method = %request.method))]
    pub async fn call(
        &self,
        request: &CallRequest<I::Request>,
        cancel: &CancellationToken,
    ) -> Result<I::Response> {
        let plan = self.interceptor.plan(&request.options, now());
        let decider = plan.decider();
        let deadline = plan.deadline();

        let mut attempts: u32 = 0;
        let mut last: Option<Status> = None;

        loop {
            if deadline.is_some_and(|at| now() >= at) {
                warn!(attempts, "deadline passed before next attempt");
                return Err(CallError::DeadlineExceeded { attempts, last });
            }

            let ctx = AttemptContext {
                method: request.method.clone(),
                attempt: attempts,
                deadline,
            };

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempts, "call cancelled during attempt");
                    return Err(CallError::Cancelled { attempts });
                }
                outcome = self.attempt(&ctx, &request.payload, deadline) => outcome,
            };
            attempts += 1;

            let status = match outcome {
                Some(Ok(response)) => return Ok(response),
                Some(Err(status)) => status,
                None => {
                    warn!(attempts, "deadline exceeded during attempt");
                    return Err(CallError::DeadlineExceeded { attempts, last });
                }
            };

            if !decider.is_retryable(status.code()) {
                if decider.is_enabled() {
                    debug!(attempts, code = %status.code(), "failure is not retryable");
                }
                return Err(CallError::Status(status));
            }

            if !decider.attempt_permitted(attempts) {
                warn!(attempts, code = %status.code(), "retry attempts exhausted");
                return Err(CallError::AttemptsExhausted {
                    attempts,
                    last: status,
                });
            }

            let delay = decider.delay_for_attempt(attempts - 1);
            if deadline.is_some_and(|at| now() + delay >= at) {
                warn!(
                    attempts,
                    delay_ms = millis(delay),
                    code = %status.code(),
                    "next retry would start after the deadline"
                );
                return Err(CallError::DeadlineExceeded {
                    attempts,
                    last: Some(status),
                });
            }

            debug!(
                attempts,
                delay_ms = millis(delay),
                code = %status.code(),
                "retry scheduled"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempts, "call cancelled during backoff");
                    return Err(CallError::Cancelled { attempts });
                }
                _ = tokio::time::sleep(delay) => {}
            }

            last = Some(status);
        }
    }

    /// One attempt, bounded by the call deadline; `None` when it timed out
    async fn attempt(
        &self,
        ctx: &AttemptContext,
        payload: &I::Request,
        deadline: Option<Instant>,
    ) -> Option<std::result::Result<I::Response, Status>> {
        let invocation = self.inner.invoke(ctx, payload);
        match deadline {
            Some(at) => tokio::time::timeout_at(tokio::time::Instant::from_std(at), invocation)
                .await
                .ok(),
            None => Some(invocation.await),
        }
    }
}

/// Whole milliseconds for log fields, saturating at `u64::MAX`
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Current time on the runtime clock, so paused test clocks apply
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
