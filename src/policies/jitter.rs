//! # Jitter policy for retry delays.
//!
//! Every process in a fleet loses its election backend at the same moment
//! when the backend goes down; [`JitterPolicy`] spreads their retries.
//!
//! - [`JitterPolicy::None`] exact delay
//! - [`JitterPolicy::Full`] random in `[0, delay]`
//! - [`JitterPolicy::Equal`] `delay/2 + random[0, delay/2]`
//!
//! Jitter only ever shortens the configured delay, never lengthens it. `Full`
//! may shorten it down to zero, so a fleet using it can retry immediately now
//! and then; pick `Equal` to keep at least half of the delay. Jitter is opt-in:
//! [`RetryPolicy::fixed`](crate::RetryPolicy::fixed) uses `None`.
//!
//! Arithmetic is done in nanoseconds, so sub-millisecond delays keep their
//! value.

use rand::Rng;
use std::time::Duration;

/// Randomization of retry delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact delay.
    #[default]
    None,
    /// Random delay in `[0, delay]`. Can be zero.
    Full,
    /// `delay/2 + random[0, delay/2]`.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to `delay`. The result never exceeds `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        if *self == JitterPolicy::None {
            return delay;
        }
        let nanos = delay.as_nanos().min(u128::from(u64::MAX)) as u64;
        if nanos == 0 {
            return Duration::ZERO;
        }
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => Duration::from_nanos(rand::rng().random_range(0..=nanos)),
            JitterPolicy::Equal => {
                let half = nanos / 2;
                let extra = rand::rng().random_range(0..=nanos - half);
                Duration::from_nanos(half + extra)
            }
        }
    }
}
