//! # Retry policy for transient election failures.
//!
//! A transient `wait_for_leadership` failure is never fatal: the controller
//! sleeps [`RetryPolicy::delay`] and tries again, forever, until it is granted
//! leadership or interrupted. The delay is fixed; [`RetryPolicy::jitter`] may
//! randomize it below that bound.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use leadvisor::{JitterPolicy, RetryPolicy};
//!
//! let retry = RetryPolicy::fixed(Duration::from_secs(5));
//! assert_eq!(retry.next(), Duration::from_secs(5));
//!
//! let spread = retry.with_jitter(JitterPolicy::Equal);
//! let d = spread.next();
//! assert!(d >= Duration::from_millis(2500) && d <= Duration::from_secs(5));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Default delay between transient election failures.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fixed-delay retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the next `wait_for_leadership` after a transient error.
    pub delay: Duration,
    /// Jitter applied to `delay`. It only shortens the delay; see [`JitterPolicy`].
    pub jitter: JitterPolicy,
}

impl Default for RetryPolicy {
    /// Returns `delay = 5s`, `jitter = None`.
    fn default() -> Self {
        Self::fixed(DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Fixed delay without jitter.
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns a copy with the given jitter policy.
    ///
    /// Jitter trades the exact delay for spread: with [`JitterPolicy::Full`]
    /// a retry may follow a failure almost immediately.
    pub const fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay to sleep before the next attempt.
    pub fn next(&self) -> Duration {
        self.jitter.apply(self.delay)
    }
}
