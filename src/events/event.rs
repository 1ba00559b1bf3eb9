//! # Runtime events emitted by the controller, runners and manager.
//!
//! [`EventKind`] classifies events in four groups:
//! - **Election**: registration, waiting, tenure start/end, retries, stop
//! - **Run**: managed task run start/stop/failure/abort
//! - **Shutdown**: termination requested, grace outcome
//! - **Subscriber**: overflow / panic of an observer
//!
//! ## Ordering guarantees
//! Each event has a globally unique, monotonically increasing `seq`.
//!
//! ## Example
//! ```rust
//! use leadvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::LeadershipAcquired)
//!     .with_candidate("10.0.0.7:15999")
//!     .with_term(4);
//!
//! assert_eq!(ev.kind, EventKind::LeadershipAcquired);
//! assert_eq!(ev.term, Some(4));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Mode ===
    /// `enable_manager = false`; nothing will run.
    ManagerDisabled,

    // === Election ===
    /// Candidate registered with the backend.
    ///
    /// Sets: `candidate`
    Registered,

    /// Registration failed; elected mode is disabled for this process.
    ///
    /// Sets: `candidate`, `reason`
    RegistrationFailed,

    /// Blocking on the backend for leadership.
    ///
    /// Sets: `candidate`
    WaitingForLeadership,

    /// Tenure started.
    ///
    /// Sets: `candidate`, `term`
    LeadershipAcquired,

    /// Tenure ended (revoked by the backend or resigned on shutdown).
    ///
    /// Sets: `candidate`, `term`
    LeadershipLost,

    /// Transient election failure; next wait after `delay_ms`.
    ///
    /// Sets: `candidate`, `reason`, `delay_ms`, `attempt` (consecutive failures)
    RetryScheduled,

    /// Election loop exited for good.
    ///
    /// Sets: `candidate`, optional `reason`
    ElectionStopped,

    // === Run ===
    /// Managed task run starting.
    ///
    /// Sets: `task`, `attempt` (run number), optional `term`
    TaskStarting,

    /// Run returned `Ok` or `Canceled`.
    ///
    /// Sets: `task`, `attempt`, optional `term`
    TaskStopped,

    /// Run returned an error.
    ///
    /// Sets: `task`, `attempt`, `reason`, optional `term`
    TaskFailed,

    /// Run ignored cancellation for longer than the grace period and was aborted.
    ///
    /// Sets: `task`, `attempt`, `delay_ms` (grace), optional `term`
    TaskAborted,

    // === Shutdown ===
    /// Termination hook fired.
    ShutdownRequested,

    /// Everything stopped within the grace period.
    AllStoppedWithin,

    /// Grace period exceeded during shutdown.
    ///
    /// Sets: `delay_ms` (grace)
    GraceExceeded,

    // === Subscriber ===
    /// Subscriber dropped an event (queue full or closed).
    ///
    /// Sets: `task` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked while processing an event.
    ///
    /// Sets: `task` (subscriber name), `reason`
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Candidate identity of this process.
    pub candidate: Option<Arc<str>>,
    /// Leadership term the event belongs to.
    pub term: Option<u64>,
    /// Task (or subscriber) name.
    pub task: Option<Arc<str>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
    /// Delay or grace in milliseconds.
    pub delay_ms: Option<u32>,
    /// Attempt or run counter.
    pub attempt: Option<u32>,
}

impl Event {
    /// Creates an event with the current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            candidate: None,
            term: None,
            task: None,
            reason: None,
            delay_ms: None,
            attempt: None,
        }
    }

    #[inline]
    pub fn with_candidate(mut self, candidate: impl Into<Arc<str>>) -> Self {
        self.candidate = Some(candidate.into());
        self
    }

    #[inline]
    pub fn with_term(mut self, term: u64) -> Self {
        self.term = Some(term);
        self
    }

    /// Sets `term` only when one is known.
    #[inline]
    pub fn with_term_opt(mut self, term: Option<u64>) -> Self {
        self.term = term;
        self
    }

    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a delay (stored as milliseconds, saturating).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }
}
