//! Error types used by the leadvisor runtime, the election seam, and managed tasks.
//!
//! - [`ElectionError`] errors surfaced by an [`Election`](crate::Election) backend.
//! - [`RedirectError`] errors surfaced to callers of the [`RedirectResolver`](crate::RedirectResolver).
//! - [`RuntimeError`] errors raised by the orchestration runtime itself.
//! - [`TaskError`] errors raised by managed task runs (opaque to the controller).
//!
//! Every enum provides `as_label` (stable snake_case label for logs/metrics).

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by an election backend.
///
/// The lifecycle controller only distinguishes two classes at wait time:
/// [`ElectionError::Interrupted`] ends the election loop, everything else is
/// retried after the configured delay.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElectionError {
    /// The backend cannot be reached (at registration time this disables elected mode).
    #[error("election backend unavailable: {reason}")]
    BackendUnavailable {
        /// Backend-specific details.
        reason: String,
    },

    /// Candidacy was stopped locally (shutdown); waiting must not be retried.
    #[error("election interrupted")]
    Interrupted,

    /// Recoverable backend failure; retry after a delay.
    #[error("transient election error: {reason}")]
    Transient {
        /// Backend-specific details.
        reason: String,
    },

    /// The backend answered but nobody currently holds leadership.
    #[error("no current leadership holder")]
    NoHolder,
}

impl ElectionError {
    /// Builds a [`ElectionError::Transient`] from anything printable.
    pub fn transient(reason: impl Into<String>) -> Self {
        ElectionError::Transient {
            reason: reason.into(),
        }
    }

    /// Builds a [`ElectionError::BackendUnavailable`] from anything printable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ElectionError::BackendUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use leadvisor::ElectionError;
    ///
    /// assert_eq!(ElectionError::Interrupted.as_label(), "election_interrupted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ElectionError::BackendUnavailable { .. } => "election_backend_unavailable",
            ElectionError::Interrupted => "election_interrupted",
            ElectionError::Transient { .. } => "election_transient",
            ElectionError::NoHolder => "election_no_holder",
        }
    }

    /// `true` only for the explicit local-stop signal.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ElectionError::Interrupted)
    }

    /// `true` for every error the election loop recovers from by retrying.
    pub fn is_transient(&self) -> bool {
        !self.is_interrupted()
    }
}

/// # Errors produced when resolving the redirect target.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    /// The current leader cannot be determined right now.
    #[error("leader unknown: {reason}")]
    LeaderUnknown {
        /// Why the leader could not be resolved.
        reason: String,
    },
}

impl RedirectError {
    pub(crate) fn unknown(reason: impl Into<String>) -> Self {
        RedirectError::LeaderUnknown {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RedirectError::LeaderUnknown { .. } => "redirect_leader_unknown",
        }
    }
}

/// # Errors produced by the leadvisor runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some runs did not stop in time.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the units that were still running.
        stuck: Vec<String>,
    },

    /// `on_run` was invoked more than once.
    #[error("manager already started")]
    AlreadyStarted,

    /// `on_run` was invoked after the termination hook fired.
    #[error("manager is shutting down")]
    ShuttingDown,

    /// `use_election` is set but no election backend was supplied.
    #[error("elected mode requested without an election backend")]
    MissingElection,

    /// `enable_manager` is set but no managed task was supplied.
    #[error("manager enabled without a managed task")]
    MissingTask,

    /// OS signal handlers could not be installed.
    #[error("cannot listen for shutdown signals: {reason}")]
    Signal {
        /// The underlying I/O error message.
        reason: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use leadvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::ShuttingDown => "runtime_shutting_down",
            RuntimeError::MissingElection => "runtime_missing_election",
            RuntimeError::MissingTask => "runtime_missing_task",
            RuntimeError::Signal { .. } => "runtime_signal",
        }
    }
}

/// # Errors produced by a managed task run.
///
/// The controller never interprets these beyond publishing them; it reacts
/// only to the end of the leadership tenure.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// The run failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The run observed its context cancellation and exited.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }
}
