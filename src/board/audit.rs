//! Gesture audit trail.
//!
//! Records capture a stage plus structured details so callers can buffer,
//! log or replay what the controller did with each user gesture without
//! threading instrumentation through the placement code.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by [`BoardController`](super::BoardController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAuditStage {
    DragStarted,
    /// Hover target changed while dragging.
    DragOverChanged,
    /// Dragged tile committed to its new anchor.
    MoveCommitted,
    /// A conflicting tile was moved by the engine.
    TileRelocated,
    /// Drop left the board untouched.
    DropIgnored,
    Reordered,
    /// Drag state cleared after a drop or an abandoned drag.
    DragCleared,
    /// Empty cell clicked; next created tile will be anchored there.
    CellArmed,
    TileCreated,
    TileUpdated,
    TileDeleted,
    /// Settled collection forwarded to the store.
    SnapshotPersisted,
}

#[derive(Debug, Clone)]
pub struct GestureAuditEvent {
    pub timestamp: SystemTime,
    pub stage: GestureAuditStage,
    pub details: Vec<(String, Value)>,
}

impl GestureAuditEvent {
    fn new(stage: GestureAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

pub struct GestureAuditEventBuilder {
    event: GestureAuditEvent,
}

impl GestureAuditEventBuilder {
    pub fn new(stage: GestureAuditStage) -> Self {
        Self {
            event: GestureAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> GestureAuditEvent {
        self.event
    }
}

pub trait GestureAudit: Send + Sync {
    fn record(&self, event: GestureAuditEvent);
}

/// Default sink when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullGestureAudit;

impl GestureAudit for NullGestureAudit {
    fn record(&self, _event: GestureAuditEvent) {}
}

/// Keeps every record in order.
#[derive(Debug, Default)]
pub struct BufferedGestureAudit {
    events: Mutex<Vec<GestureAuditEvent>>,
}

impl BufferedGestureAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<GestureAuditStage> {
        self.events
            .lock()
            .map(|events| events.iter().map(|e| e.stage).collect())
            .unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<GestureAuditEvent> {
        self.events
            .lock()
            .map(|mut events| events.drain(..).collect())
            .unwrap_or_default()
    }
}

impl GestureAudit for BufferedGestureAudit {
    fn record(&self, event: GestureAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<T: GestureAudit + ?Sized> GestureAudit for std::sync::Arc<T> {
    fn record(&self, event: GestureAuditEvent) {
        (**self).record(event);
    }
}
