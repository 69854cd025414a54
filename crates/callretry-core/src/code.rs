//! Failure kinds reported by the call transport and the retryable subsets.
//!
//! [`Code`] is the closed enumeration of outcome kinds a single attempt can
//! report. [`RetryableCodes`] names the two fixed sets of codes that are worth
//! retrying: the full set, and the same set without `INTERNAL`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome kind of a single call attempt.
///
/// Numeric values follow the conventional RPC status numbering (0..=16).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    /// Not an error.
    Ok = 0,
    /// The caller cancelled the operation.
    Cancelled = 1,
    /// Unknown error, including codes outside this enumeration.
    Unknown = 2,
    /// The client specified an invalid argument.
    InvalidArgument = 3,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded = 4,
    /// Some requested entity was not found.
    NotFound = 5,
    /// The entity a client attempted to create already exists.
    AlreadyExists = 6,
    /// The caller lacks permission for the operation.
    PermissionDenied = 7,
    /// Some resource has been exhausted (quota, capacity).
    ResourceExhausted = 8,
    /// The system is not in a state required for the operation.
    FailedPrecondition = 9,
    /// The operation was aborted, typically due to a concurrency conflict.
    Aborted = 10,
    /// The operation was attempted past the valid range.
    OutOfRange = 11,
    /// The operation is not implemented or supported.
    Unimplemented = 12,
    /// Internal invariant broken on the serving side.
    Internal = 13,
    /// The service is currently unavailable.
    Unavailable = 14,
    /// Unrecoverable data loss or corruption.
    DataLoss = 15,
    /// The request lacks valid authentication credentials.
    Unauthenticated = 16,
}

impl Code {
    /// Every code, in numeric order.
    pub const ALL: [Code; 17] = [
        Code::Ok,
        Code::Cancelled,
        Code::Unknown,
        Code::InvalidArgument,
        Code::DeadlineExceeded,
        Code::NotFound,
        Code::AlreadyExists,
        Code::PermissionDenied,
        Code::ResourceExhausted,
        Code::FailedPrecondition,
        Code::Aborted,
        Code::OutOfRange,
        Code::Unimplemented,
        Code::Internal,
        Code::Unavailable,
        Code::DataLoss,
        Code::Unauthenticated,
    ];

    /// Map a numeric transport code to a [`Code`].
    ///
    /// Values outside `0..=16` are reported as [`Code::Unknown`].
    pub fn from_i32(value: i32) -> Code {
        usize::try_from(value)
            .ok()
            .and_then(|index| Code::ALL.get(index).copied())
            .unwrap_or(Code::Unknown)
    }

    /// Numeric value of this code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Canonical upper-case name, e.g. `"RESOURCE_EXHAUSTED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Codes the serving side never produces spuriously.
    ///
    /// Retrying one of these cannot change the outcome.
    pub fn is_never_generated(self) -> bool {
        matches!(
            self,
            Code::InvalidArgument
                | Code::NotFound
                | Code::AlreadyExists
                | Code::FailedPrecondition
                | Code::OutOfRange
                | Code::DataLoss
        )
    }

    /// Codes that come from the caller's own timeout or cancellation.
    ///
    /// Retrying these would override the caller's decision to stop waiting.
    pub fn is_caller_originated(self) -> bool {
        matches!(self, Code::DeadlineExceeded | Code::Cancelled)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        Code::from_i32(value)
    }
}

const RETRYABLE: &[Code] = &[
    Code::Aborted,
    Code::Internal,
    Code::ResourceExhausted,
    Code::Unavailable,
    Code::Unknown,
];

const RETRYABLE_WITHOUT_INTERNAL: &[Code] = &[
    Code::Aborted,
    Code::ResourceExhausted,
    Code::Unavailable,
    Code::Unknown,
];

/// The fixed sets of retryable codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryableCodes {
    /// `ABORTED, INTERNAL, RESOURCE_EXHAUSTED, UNAVAILABLE, UNKNOWN`.
    #[default]
    All,
    /// `ABORTED, RESOURCE_EXHAUSTED, UNAVAILABLE, UNKNOWN`.
    ///
    /// Used when internal errors are handled by a higher-level fallback.
    WithoutInternal,
}

impl RetryableCodes {
    /// Pick the set matching the exclude-internal toggle.
    pub fn for_exclusion(exclude_internal: bool) -> Self {
        if exclude_internal {
            RetryableCodes::WithoutInternal
        } else {
            RetryableCodes::All
        }
    }

    /// Members of this set.
    pub fn codes(self) -> &'static [Code] {
        match self {
            RetryableCodes::All => RETRYABLE,
            RetryableCodes::WithoutInternal => RETRYABLE_WITHOUT_INTERNAL,
        }
    }

    /// Whether `code` belongs to this set.
    pub fn contains(self, code: Code) -> bool {
        self.codes().contains(&code)
    }
}
