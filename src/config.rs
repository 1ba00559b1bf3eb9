//! # Runtime configuration.
//!
//! [`Config`] selects the manager mode and tunes the election loop.
//!
//! | `enable_manager` | `use_election` | Mode                                  |
//! |------------------|----------------|---------------------------------------|
//! | `false`          | any            | disabled: nothing constructed         |
//! | `true`           | `false`        | standalone: run once, until shutdown  |
//! | `true`           | `true`         | elected: run only while leader        |
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use leadvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.enable_manager = true;
//! cfg.use_election = true;
//! let cfg = cfg.with_retry_delay(Duration::from_secs(2));
//!
//! assert_eq!(cfg.retry.delay, Duration::from_secs(2));
//! ```

use std::time::Duration;

use crate::policies::RetryPolicy;

/// Configuration for the manager runtime.
///
/// ## Field semantics
/// - `enable_manager`: when `false`, no controller is ever constructed
/// - `use_election`: elected lifecycle controller vs. standalone runner
/// - `retry`: delay between transient election failures (default 5s)
/// - `grace`: how long a cancelled run may keep going before it is aborted
/// - `election_name`: name candidates contend on at the backend
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Construct and run the manager at all.
    pub enable_manager: bool,

    /// Use leader election to decide which process runs the manager.
    pub use_election: bool,

    /// Retry policy for transient election failures.
    pub retry: RetryPolicy,

    /// Bounded time a cancelled run gets to checkpoint and exit.
    ///
    /// Applied both when leadership is lost (before the next tenure may
    /// start a new run) and at process shutdown.
    pub grace: Duration,

    /// Election (lock) name shared by all candidates of one fleet.
    ///
    /// The backend constructor consumes it (e.g. [`MemoryElection::new`]);
    /// the controller only uses it to label registration and retry logs.
    ///
    /// [`MemoryElection::new`]: crate::MemoryElection::new
    pub election_name: String,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a copy with a fixed retry delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry = RetryPolicy::fixed(delay);
        self
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `enable_manager = false`, `use_election = false`
    /// - `retry = 5s fixed`
    /// - `grace = 30s`
    /// - `election_name = "manager"`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            enable_manager: false,
            use_election: false,
            retry: RetryPolicy::default(),
            grace: Duration::from_secs(30),
            election_name: "manager".to_string(),
            bus_capacity: 1024,
        }
    }
}
