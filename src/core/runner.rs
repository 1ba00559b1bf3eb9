//! # Run the managed task once under a run context.
//!
//! ```text
//! publish TaskStarting
//! task.run(ctx) ──► Ok / Err(Canceled) ──► publish TaskStopped
//!               └─► Err(Fail)          ──► publish TaskFailed
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event.
//! - `Canceled` is a graceful exit, not a failure.
//! - The error is returned to the caller but never interpreted by the controller.

use tokio_util::sync::CancellationToken;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::ManagedTask,
};

/// Executes one run of `task` with `ctx`, publishing lifecycle events to `bus`.
///
/// `term` is the leadership term the run belongs to (`None` in standalone mode).
pub async fn run_once<T: ManagedTask + ?Sized>(
    task: &T,
    ctx: CancellationToken,
    run: u32,
    term: Option<u64>,
    bus: &Bus,
) -> Result<(), TaskError> {
    bus.publish(
        Event::new(EventKind::TaskStarting)
            .with_task(task.name())
            .with_attempt(run)
            .with_term_opt(term),
    );

    let res = task.run(ctx).await;
    let ev = match &res {
        Ok(()) | Err(TaskError::Canceled) => Event::new(EventKind::TaskStopped),
        Err(e) => Event::new(EventKind::TaskFailed).with_reason(e.to_string()),
    };
    bus.publish(
        ev.with_task(task.name())
            .with_attempt(run)
            .with_term_opt(term),
    );
    res
}
