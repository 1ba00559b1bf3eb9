//! # Election client seam.
//!
//! The election backend (consensus store, lock service, ...) is external; this
//! module is the narrow interface the lifecycle controller talks to.
//!
//! ```text
//! Election::register(candidate) ──► Participation
//!                                     ├─ wait_for_leadership() ──► LeadershipContext { term, token }
//!                                     ├─ current_holder()      ──► identity of the holder
//!                                     └─ stop()                ──► resign; pending wait → Interrupted
//! ```
//!
//! ## Contract for implementors
//! - At most one [`LeadershipContext`] is live (token not cancelled) across
//!   all participations of one election at any instant, up to the backend's
//!   own revocation latency.
//! - The token of a tenure is cancelled when the tenure ends for any reason.
//! - After `stop()`, every pending and future `wait_for_leadership` returns
//!   [`ElectionError::Interrupted`].
//! - `current_holder()` must not block waiting for a holder to appear.
//!
//! [`MemoryElection`] is an in-process backend honoring this contract.

mod memory;

pub use memory::MemoryElection;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ElectionError;

/// Entry point of an election backend.
#[async_trait]
pub trait Election: Send + Sync + 'static {
    /// Registers `candidate` (this process' advertised identity).
    ///
    /// Fails with [`ElectionError::BackendUnavailable`] when the backend cannot
    /// be reached; the caller then disables elected mode.
    async fn register(&self, candidate: &str) -> Result<Arc<dyn Participation>, ElectionError>;
}

/// A registered candidacy.
#[async_trait]
pub trait Participation: Send + Sync + 'static {
    /// Identity this participation was registered with.
    fn candidate(&self) -> &str;

    /// Blocks until this candidate holds leadership or an error occurs.
    async fn wait_for_leadership(&self) -> Result<LeadershipContext, ElectionError>;

    /// Identity of the current holder, without waiting.
    async fn current_holder(&self) -> Result<String, ElectionError>;

    /// Resigns candidacy. Idempotent.
    fn stop(&self);
}

/// One tenure as leadership holder.
///
/// Valid exactly while `token` is not cancelled.
#[derive(Clone, Debug)]
pub struct LeadershipContext {
    term: u64,
    token: CancellationToken,
}

impl LeadershipContext {
    /// Wraps a backend tenure.
    pub fn new(term: u64, token: CancellationToken) -> Self {
        Self { term, token }
    }

    /// Backend term (monotonic per election).
    pub fn term(&self) -> u64 {
        self.term
    }

    /// Tenure validity token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// `true` while the tenure lasts.
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Completes when the tenure ends.
    pub async fn ended(&self) {
        self.token.cancelled().await
    }

    /// Fresh run context bound to this tenure.
    pub fn run_context(&self) -> CancellationToken {
        self.token.child_token()
    }
}

/// Result of one `wait_for_leadership` call, classified for the controller.
#[derive(Debug)]
pub enum WaitOutcome {
    /// Leadership granted.
    Acquired(LeadershipContext),
    /// Candidacy was stopped; the loop must end.
    Interrupted,
    /// Anything else; retry after the configured delay.
    Transient(ElectionError),
}

impl From<Result<LeadershipContext, ElectionError>> for WaitOutcome {
    fn from(res: Result<LeadershipContext, ElectionError>) -> Self {
        match res {
            Ok(ctx) => WaitOutcome::Acquired(ctx),
            Err(ElectionError::Interrupted) => WaitOutcome::Interrupted,
            Err(e) => WaitOutcome::Transient(e),
        }
    }
}
