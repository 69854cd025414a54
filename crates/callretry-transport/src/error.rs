//! Transport error types

use callretry_core::Code;
use thiserror::Error;

/// Result type for retried calls
pub type Result<T> = std::result::Result<T, CallError>;

/// Failure reported by a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    /// Create a status with the given code and message.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Failure kind.
    pub fn code(&self) -> Code {
        self.code
    }

    /// Human-readable detail.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `UNAVAILABLE` status.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, message)
    }

    /// `INTERNAL` status.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    /// `DEADLINE_EXCEEDED` status.
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(Code::DeadlineExceeded, message)
    }
}

/// Terminal outcome of a (possibly retried) call.
#[derive(Debug, Error)]
pub enum CallError {
    /// A non-retryable failure, surfaced exactly as the attempt reported it
    #[error(transparent)]
    Status(#[from] Status),

    /// The attempt cap was reached while failures were still retryable
    #[error("gave up after {attempts} attempts: {last}")]
    AttemptsExhausted {
        /// Attempts issued, including the original one.
        attempts: u32,
        /// Failure of the final attempt.
        last: Status,
    },

    /// The call's deadline expired during an attempt or before the next one
    #[error("deadline exceeded after {attempts} attempts")]
    DeadlineExceeded {
        /// Attempts issued, including the original one.
        attempts: u32,
        /// Last failure observed before the deadline, if any.
        last: Option<Status>,
    },

    /// The caller cancelled the call
    #[error("call cancelled after {attempts} attempts")]
    Cancelled {
        /// Attempts issued before cancellation.
        attempts: u32,
    },
}

impl CallError {
    /// Code summarizing this outcome.
    ///
    /// Exhaustion reports the code of the last failure; deadline and
    /// cancellation outcomes report their own codes.
    pub fn code(&self) -> Code {
        match self {
            Self::Status(status) => status.code(),
            Self::AttemptsExhausted { last, .. } => last.code(),
            Self::DeadlineExceeded { .. } => Code::DeadlineExceeded,
            Self::Cancelled { .. } => Code::Cancelled,
        }
    }

    /// The last failure reported by an attempt, if any.
    pub fn last_status(&self) -> Option<&Status> {
        match self {
            Self::Status(status) => Some(status),
            Self::AttemptsExhausted { last, .. } => Some(last),
            Self::DeadlineExceeded { last, .. } => last.as_ref(),
            Self::Cancelled { .. } => None,
        }
    }
}
