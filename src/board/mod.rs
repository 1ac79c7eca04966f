//! Board controller: the caller-side owner of the tile collection.
//!
//! Gestures from the rendering layer come in through
//! [`BoardController::handle`]; every settled change produces a fresh
//! collection that is fingerprinted and forwarded to the [`BoardStore`].

pub mod audit;
mod controller;
pub mod store;

pub use audit::{
    BufferedGestureAudit, GestureAudit, GestureAuditEvent, GestureAuditEventBuilder,
    GestureAuditStage, NullGestureAudit,
};
pub use controller::{BoardController, DragOver, DragState, GestureEvent, GestureOutcome};
pub use store::{BoardSnapshot, BoardStore, MemoryStore, SNAPSHOT_VERSION, SnapshotTracker};
