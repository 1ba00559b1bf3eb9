//! # leadvisor
//!
//! **Leadvisor** runs one long-lived manager task per process, and, when a
//! fleet of identical processes shares an election backend, on exactly one of
//! them at a time. Non-leaders learn where the leader is so they can redirect
//! requests to it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐        ┌──────────────────┐       ┌──────────────┐
//!     │    Config    │        │  Election (dyn)  │       │  ManagedTask │
//!     │ enable/elect │        │  backend client  │       │ (user code)  │
//!     └──────┬───────┘        └────────┬─────────┘       └──────┬───────┘
//!            ▼                         ▼                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Manager (host wiring)                                            │
//! │  - Bus (broadcast events) ──► SubscriberSet ──► LogWriter, ...    │
//! │  - TerminationHook (exactly-once shutdown)                        │
//! │  - RedirectResolver (read-only view of the current leader)        │
//! └──────┬────────────────────────────┬───────────────────────────────┘
//!        ▼ use_election = false       ▼ use_election = true
//! ┌──────────────────┐      ┌─────────────────────────────────────────┐
//! │ StandaloneRunner │      │ LifecycleController                     │
//! │ one run until    │      │ register ─► wait ─► lead ─► cancel ─►   │
//! │ shutdown         │      │ wait ... (5s retry on transient errors) │
//! └──────────────────┘      └─────────────────────────────────────────┘
//! ```
//!
//! ### Elected lifecycle
//! ```text
//! on_run(self_addr)
//!   └─► register(self_addr) ── Err ──► RegistrationFailed, keep serving, never lead
//!         │ Ok
//!         ▼
//! loop {
//!   ├─► wait_for_leadership()
//!   │       ├─ Ok(tenure)    ─► spawn run(tenure.child_token())
//!   │       │                   wait tenure end ─► cancel ─► wait ≤ grace ─► abort
//!   │       ├─ Interrupted   ─► exit loop
//!   │       └─ other error   ─► RetryScheduled, sleep(retry), continue
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                         |
//! |-----------------|----------------------------------------------------------|--------------------------------------------|
//! | **Manager**     | Mode selection, two-phase start, bounded shutdown.       | [`Manager`], [`ManagerBuilder`], [`Mode`]  |
//! | **Election**    | Backend seam plus an in-process backend.                 | [`Election`], [`Participation`], [`MemoryElection`] |
//! | **Lifecycle**   | Leader-only runs, retry loop, exactly-once termination.  | [`LifecycleController`], [`TerminationHook`] |
//! | **Redirect**    | Where to send a request this process cannot serve.       | [`RedirectResolver`], [`Route`]            |
//! | **Subscribers** | Observe runtime events (logging via `tracing`).          | [`Subscribe`], [`LogWriter`]               |
//! | **Errors**      | Typed errors with stable labels.                         | [`ElectionError`], [`RuntimeError`]        |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use leadvisor::{Config, LogWriter, Manager, MemoryElection, Subscribe, TaskFn, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.enable_manager = true;
//!     cfg.use_election = true;
//!     cfg.grace = Duration::from_secs(2);
//!
//!     let workflows: TaskRef = TaskFn::arc("workflows", |ctx: CancellationToken| async move {
//!         while !ctx.is_cancelled() {
//!             tokio::time::sleep(Duration::from_millis(50)).await;
//!         }
//!         Ok(())
//!     });
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let manager = Manager::builder(cfg.clone())
//!         .with_task(workflows)
//!         .with_election(Arc::new(MemoryElection::new(cfg.election_name)))
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     manager.on_run("10.0.0.1:15999").await?;
//!     tokio::time::sleep(Duration::from_millis(100)).await;
//!     manager.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod election;
mod error;
mod events;
mod policies;
mod redirect;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{
    ControllerState, LifecycleController, Manager, ManagerBuilder, Mode, Sleeper, Step,
    TerminationHook, TokioSleeper, step,
};
pub use election::{Election, LeadershipContext, MemoryElection, Participation, WaitOutcome};
pub use error::{ElectionError, RedirectError, RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::{JitterPolicy, RetryPolicy};
pub use redirect::{RedirectResolver, Route};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use tasks::{ManagedTask, TaskFn, TaskRef};
