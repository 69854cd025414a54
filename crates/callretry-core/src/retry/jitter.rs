//! Symmetric jitter for retry delays.
//!
//! Each draw uses the calling thread's generator, so concurrent calls neither
//! contend on a lock nor share a sequence that would line their retries up.

use rand::Rng;
use std::time::Duration;

/// Randomize `delay` uniformly within `[delay * (1 - jitter), delay * (1 + jitter)]`.
///
/// A non-positive (or NaN) `jitter` returns `delay` unchanged; values above
/// 1.0 are treated as 1.0. Results beyond the representable range saturate.
///
/// # Examples
///
/// ```rust
/// use callretry_core::retry::apply_jitter;
/// use std::time::Duration;
///
/// let delay = apply_jitter(Duration::from_secs(1), 0.2);
/// assert!(delay >= Duration::from_millis(800));
/// assert!(delay <= Duration::from_millis(1200));
/// ```
pub fn apply_jitter(delay: Duration, jitter: f64) -> Duration {
    if jitter.is_nan() || jitter <= 0.0 || delay.is_zero() {
        return delay;
    }

    let jitter = jitter.min(1.0);
    let nanos = delay.as_nanos() as f64;
    let low = nanos * (1.0 - jitter);
    let high = nanos * (1.0 + jitter);

    let drawn = rand::thread_rng().gen_range(low..=high);
    // float to int casts saturate
    Duration::from_nanos(drawn as u64)
}
