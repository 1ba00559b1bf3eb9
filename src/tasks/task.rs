//! # Managed task trait.
//!
//! The managed task is the unit of work that must never run on two processes
//! at once. It receives a run context ([`CancellationToken`]) that is cancelled
//! when leadership is lost **or** when the process shuts down; both causes use
//! the same signal so the task has a single cancellation contract.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// # Shared handle to a managed task.
pub type TaskRef = Arc<dyn ManagedTask>;

/// # Long-running, cooperatively cancellable manager runtime.
///
/// A run is started fresh for every leadership tenure (or once, in standalone
/// mode). Cancellation is a signal, not a kill: after `ctx` is cancelled the
/// task may checkpoint briefly, but should return within the configured
/// [`Config::grace`](crate::Config::grace).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use leadvisor::{ManagedTask, TaskError};
///
/// struct Reconciler;
///
/// #[async_trait]
/// impl ManagedTask for Reconciler {
///     fn name(&self) -> &str { "reconciler" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
///         ctx.cancelled().await;
///         // persist progress here
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ManagedTask: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Runs until `ctx` is cancelled (or the work ends on its own).
    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError>;
}
