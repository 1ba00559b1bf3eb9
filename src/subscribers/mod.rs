//! # Event subscribers.
//!
//! ```text
//! Controller ── publish(Event) ──► Bus ──► Manager listener ──► SubscriberSet
//!                                                        ┌─────────┼─────────┐
//!                                                        ▼         ▼         ▼
//!                                                    LogWriter  Metrics   Custom
//! ```
//!
//! - [`Subscribe`] extension point for observers
//! - [`SubscriberSet`] non-blocking fan-out with per-subscriber queues
//! - [`LogWriter`] renders events through `tracing`

mod log;
mod subscriber;
mod subscriber_set;

pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
