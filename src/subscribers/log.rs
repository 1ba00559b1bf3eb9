//! # LogWriter: renders events through `tracing`.
//!
//! Registration failures and retried wait errors are already logged at
//! `error` by the controller itself; here they are repeated at `debug`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  leadvisor: registered candidate="10.0.0.7:15999"
//! DEBUG leadvisor: election wait failed, retrying candidate="10.0.0.7:15999" delay_ms=5000 err="transient election error: etcd timeout"
//! INFO  leadvisor: leadership acquired candidate="10.0.0.7:15999" term=3
//! WARN  leadvisor: leadership lost candidate="10.0.0.7:15999" term=3
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let candidate = e.candidate.as_deref().unwrap_or("-");
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::ManagerDisabled => {
                tracing::info!(target: "leadvisor", "manager disabled by configuration");
            }
            EventKind::Registered => {
                tracing::info!(target: "leadvisor", candidate, "registered");
            }
            EventKind::RegistrationFailed => {
                tracing::debug!(
                    target: "leadvisor",
                    candidate,
                    err = reason,
                    "cannot register for election, disabling elected manager"
                );
            }
            EventKind::WaitingForLeadership => {
                tracing::debug!(target: "leadvisor", candidate, "waiting for leadership");
            }
            EventKind::LeadershipAcquired => {
                tracing::info!(target: "leadvisor", candidate, term = e.term, "leadership acquired");
            }
            EventKind::LeadershipLost => {
                tracing::warn!(target: "leadvisor", candidate, term = e.term, "leadership lost");
            }
            EventKind::RetryScheduled => {
                tracing::debug!(
                    target: "leadvisor",
                    candidate,
                    delay_ms = e.delay_ms,
                    failures = e.attempt,
                    err = reason,
                    "election wait failed, retrying"
                );
            }
            EventKind::ElectionStopped => {
                tracing::info!(target: "leadvisor", candidate, reason, "election stopped");
            }
            EventKind::TaskStarting => {
                tracing::info!(target: "leadvisor", task, run = e.attempt, term = e.term, "run starting");
            }
            EventKind::TaskStopped => {
                tracing::info!(target: "leadvisor", task, run = e.attempt, term = e.term, "run stopped");
            }
            EventKind::TaskFailed => {
                tracing::warn!(
                    target: "leadvisor",
                    task,
                    run = e.attempt,
                    term = e.term,
                    err = reason,
                    "run failed"
                );
            }
            EventKind::TaskAborted => {
                tracing::error!(
                    target: "leadvisor",
                    task,
                    run = e.attempt,
                    grace_ms = e.delay_ms,
                    "run ignored cancellation past grace, aborted"
                );
            }
            EventKind::ShutdownRequested => {
                tracing::info!(target: "leadvisor", "shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                tracing::info!(target: "leadvisor", "all stopped within grace");
            }
            EventKind::GraceExceeded => {
                tracing::error!(target: "leadvisor", grace_ms = e.delay_ms, "grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "leadvisor", subscriber = task, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "leadvisor", subscriber = task, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
