//! # Redirect resolver.
//!
//! Request-serving code consults [`RedirectResolver`] when this process is not
//! running the manager, to learn where to forward the client. The resolver
//! only holds a read capability: it asks the backend for the current holder on
//! every call and never caches the answer.
//!
//! ```text
//! handler ──► resolver.route() ──► Participation::current_holder()
//!                  ├─ holder == self ──► Route::Local
//!                  ├─ holder == peer ──► Route::Redirect(peer)
//!                  └─ unknown / error ──► RedirectError::LeaderUnknown
//! ```

use std::sync::{Arc, OnceLock};

use crate::election::Participation;
use crate::error::RedirectError;

/// Where a manager request should be served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// This process runs the manager.
    Local,
    /// Forward to the given holder identity (its advertised address).
    Redirect(String),
}

/// Lazily wired, read-only view of the current leader.
///
/// Clones share the wiring. Safe to call concurrently with the controller.
#[derive(Clone, Default)]
pub struct RedirectResolver {
    source: Arc<OnceLock<Arc<dyn Participation>>>,
}

impl RedirectResolver {
    /// Creates an unwired resolver; every query fails with `LeaderUnknown`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the resolver to a registered candidacy. Only the first call counts.
    pub(crate) fn wire(&self, participation: Arc<dyn Participation>) {
        let _ = self.source.set(participation);
    }

    /// `true` once registration succeeded.
    pub fn is_wired(&self) -> bool {
        self.source.get().is_some()
    }

    /// Identity (address) of the current leader.
    pub async fn resolve_leader(&self) -> Result<String, RedirectError> {
        let p = self
            .source
            .get()
            .ok_or_else(|| RedirectError::unknown("election not registered"))?;
        match p.current_holder().await {
            Ok(holder) if !holder.is_empty() => Ok(holder),
            Ok(_) => Err(RedirectError::unknown("backend reported an empty holder")),
            Err(e) => Err(RedirectError::unknown(e.to_string())),
        }
    }

    /// Resolves the leader and compares it with this process' identity.
    pub async fn route(&self) -> Result<Route, RedirectError> {
        let holder = self.resolve_leader().await?;
        match self.source.get() {
            Some(p) if p.candidate() == holder => Ok(Route::Local),
            _ => Ok(Route::Redirect(holder)),
        }
    }
}
