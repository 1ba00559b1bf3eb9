//! Runtime core: who runs the managed task, and when.
//!
//! - [`manager`]: host wiring, mode selection, bounded shutdown;
//! - [`controller`]: elected mode, runs the task only while leader;
//! - [`standalone`]: one unconditional run until shutdown;
//! - [`runner`]: executes one run and publishes its lifecycle events;
//! - [`hook`]: exactly-once termination action;
//! - [`shutdown`]: OS signal handling.

mod controller;
mod hook;
mod manager;
mod runner;
mod shutdown;
mod standalone;

pub use controller::{ControllerState, LifecycleController, Sleeper, Step, TokioSleeper, step};
pub use hook::TerminationHook;
pub use manager::{Manager, ManagerBuilder, Mode};
