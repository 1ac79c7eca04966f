//! Placement engine for a bento-style tile board.
//!
//! Tiles live on a fixed-width grid of 1-based cells. The engine auto-places
//! unpositioned tiles, relocates tiles displaced by a drag-and-drop move,
//! reorders the linear (compact) view and lists the empty cells of the canvas.
//! The [`BoardController`] wraps those pure functions with gesture handling,
//! structured logging, metrics and snapshot forwarding.

pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod metrics;
pub mod placement;
pub mod render;
pub mod tile;

pub use board::{
    BoardController, BoardSnapshot, BoardStore, BufferedGestureAudit, DragOver, DragState,
    GestureAudit, GestureAuditEvent, GestureAuditStage, GestureEvent, GestureOutcome, MemoryStore,
    NullGestureAudit,
};
pub use config::{CANVAS_COLUMNS, DEFAULT_PROBE_ROWS, EngineConfig, GridConfig, RowProbe};
pub use error::{PlacementError, Result};
pub use geometry::{Cell, CellKey, Footprint, effective_col_span};
pub use logging::{LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, PlacementMetrics};
pub use placement::{
    AutoPlacement, CanvasLayout, DropTarget, IgnoredDrop, OccupancyIndex, Relocated, Resolution,
    auto_place, conflicts_with, empty_cells, overlaps, place, reading_order, reorder, resolve_move,
};
pub use render::{BoardDump, DumpSettings};
pub use tile::{Tile, TileId, TileKind, TilePayload};
