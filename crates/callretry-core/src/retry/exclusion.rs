//! Process-wide toggle that removes `INTERNAL` from the retryable set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, atomically updated "exclude internal errors from retry" flag.
///
/// Clones share the same underlying value, so an admin path can flip it while
/// calls are in flight. Each call reads it once, when its decider is built;
/// a toggle does not affect calls that already made that read.
///
/// Separate instances are independent, which lets tests inject their own.
///
/// # Examples
///
/// ```rust
/// use callretry_core::retry::ExcludeInternalFlag;
///
/// let flag = ExcludeInternalFlag::default();
/// let admin = flag.clone();
///
/// admin.enable();
/// assert!(flag.is_enabled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExcludeInternalFlag {
    inner: Arc<AtomicBool>,
}

impl ExcludeInternalFlag {
    /// Create a new flag with the given initial value.
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Current value.
    pub fn is_enabled(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }

    /// Replace the current value.
    pub fn set(&self, enabled: bool) {
        self.inner.store(enabled, Ordering::Relaxed);
        #[cfg(feature = "tracing")]
        tracing::info!(enabled, "exclude-internal retry flag updated");
    }

    /// Stop retrying `INTERNAL` failures.
    pub fn enable(&self) {
        self.set(true);
    }

    /// Retry `INTERNAL` failures again.
    pub fn disable(&self) {
        self.set(false);
    }
}
