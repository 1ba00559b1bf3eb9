//! # Event subscriber trait.
//!
//! Each subscriber gets a dedicated worker task and a bounded queue; a slow or
//! panicking subscriber only affects itself.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use leadvisor::{Event, EventKind, Subscribe};
//!
//! struct Failovers;
//!
//! #[async_trait]
//! impl Subscribe for Failovers {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::LeadershipLost) {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failovers" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; panics are caught and reported as `SubscriberPanicked`.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event (FIFO per subscriber).
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue capacity for this subscriber (clamped to at least 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
