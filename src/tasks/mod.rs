//! # Managed task abstractions.
//!
//! - [`ManagedTask`] trait for the long-running manager runtime
//! - [`TaskFn`] closure-backed implementation
//! - [`TaskRef`] shared handle (`Arc<dyn ManagedTask>`)

mod task;
mod task_fn;

pub use task::{ManagedTask, TaskRef};
pub use task_fn::TaskFn;
