//! vidport-core: shared types, IDs, errors, and the notification bus.
//!
//! This crate is the foundational dependency for the other vidport crates,
//! providing typed identifiers, a unified error type, and a broadcast bus
//! that carries user-facing notices to whatever shell is presenting them.

pub mod error;
pub mod events;
pub mod ids;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use events::{Event, EventBus, Notice, NoticeLevel};
pub use ids::*;
