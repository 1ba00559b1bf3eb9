//! # Standalone runner.
//!
//! Used when elected mode is off: one run, started immediately, under a
//! context tied to the process lifetime. The termination hook cancels it.
//! No election calls, no retries.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::core::{hook::TerminationHook, runner::run_once};
use crate::events::Bus;
use crate::tasks::TaskRef;

/// Runs the managed task unconditionally until shutdown.
pub struct StandaloneRunner {
    task: TaskRef,
    bus: Bus,
    hook: Arc<TerminationHook>,
}

impl StandaloneRunner {
    pub(crate) fn new(task: TaskRef, bus: Bus, hook: Arc<TerminationHook>) -> Self {
        Self { task, bus, hook }
    }

    /// Spawns the single run. The returned handle completes when the run exits.
    pub(crate) fn start(&self) -> JoinHandle<()> {
        let ctx = self.hook.root().child_token();
        self.hook.set_active(ctx.clone());

        let task = Arc::clone(&self.task);
        let bus = self.bus.clone();
        tokio::spawn(async move {
            let _ = run_once(task.as_ref(), ctx, 1, None, &bus).await;
        })
    }
}
