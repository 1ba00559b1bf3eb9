//! Retry policies for the election loop.
//!
//! ## Contents
//! - [`RetryPolicy`] fixed delay between transient election failures
//! - [`JitterPolicy`] optional randomization so a fleet does not retry in lockstep
//!
//! ## Defaults
//! - `RetryPolicy::default()` → 5s, `JitterPolicy::None`.

mod jitter;
mod retry;

pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
