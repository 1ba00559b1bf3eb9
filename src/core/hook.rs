//! # Termination hook.
//!
//! Registered once when the manager is constructed and fired once on graceful
//! shutdown. Firing is synchronous and latched:
//!
//! ```text
//! fire()
//!   ├─► latch (second and later calls return false, do nothing)
//!   ├─► publish ShutdownRequested
//!   ├─► cancel active run context (if any)
//!   ├─► cancel process-lifetime token (wakes retry sleeps)
//!   └─► participation.stop() (if elected mode registered)
//! ```
//!
//! Attaching a run context or participation after the hook fired cancels /
//! stops it immediately, so a shutdown racing a late registration still ends
//! in `Interrupted`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::election::Participation;
use crate::events::{Bus, Event, EventKind};

/// Exactly-once shutdown action for the manager.
pub struct TerminationHook {
    fired: AtomicBool,
    stop_sent: AtomicBool,
    root: CancellationToken,
    active: Mutex<Option<CancellationToken>>,
    participation: OnceLock<Arc<dyn Participation>>,
    bus: Bus,
}

impl TerminationHook {
    /// Creates an unfired hook with a fresh process-lifetime token.
    pub fn new(bus: Bus) -> Self {
        Self {
            fired: AtomicBool::new(false),
            stop_sent: AtomicBool::new(false),
            root: CancellationToken::new(),
            active: Mutex::new(None),
            participation: OnceLock::new(),
            bus,
        }
    }

    /// Process-lifetime token; cancelled when the hook fires.
    pub fn root(&self) -> &CancellationToken {
        &self.root
    }

    /// `true` once [`fire`](Self::fire) ran.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    fn active(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the run context that shutdown must cancel.
    pub(crate) fn set_active(&self, ctx: CancellationToken) {
        let mut slot = self.active();
        if self.has_fired() {
            ctx.cancel();
        }
        *slot = Some(ctx);
    }

    /// Forgets the run context once its run has finished.
    pub(crate) fn clear_active(&self) {
        self.active().take();
    }

    /// Records the candidacy that shutdown must stop. Only the first call counts.
    pub(crate) fn attach(&self, participation: Arc<dyn Participation>) {
        if self.participation.set(participation).is_ok() && self.has_fired() {
            self.stop_participation();
        }
    }

    fn stop_participation(&self) {
        if let Some(p) = self.participation.get() {
            if !self.stop_sent.swap(true, Ordering::SeqCst) {
                p.stop();
            }
        }
    }

    /// Runs the shutdown action. Returns `false` if it already ran.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.bus.publish(Event::new(EventKind::ShutdownRequested));

        // Read under the lock so a concurrent set_active either sees the latch or is cancelled here.
        if let Some(ctx) = self.active().as_ref() {
            ctx.cancel();
        }
        self.root.cancel();
        self.stop_participation();
        true
    }
}
