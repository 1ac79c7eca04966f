//! Grid placement engine.
//!
//! Every function here is pure: it takes the tile collection (plus grid
//! configuration) and returns new values. Occupancy is rebuilt from the
//! collection on every call.

pub mod canvas;
pub mod collision;
pub mod occupancy;
pub mod placer;
pub mod relocation;
pub mod reorder;

pub use canvas::{CanvasLayout, TRAILING_ROWS, empty_cells};
pub use collision::{conflicts_with, overlapping_pairs, overlaps};
pub use occupancy::OccupancyIndex;
pub use placer::{AutoPlacement, Placement, auto_place, place, place_or_fallback};
pub use relocation::{
    DropTarget, IgnoredDrop, MoveCommit, RelocationResolver, Relocated, Resolution, ResolverState,
    resolve_move,
};
pub use reorder::{reading_order, reorder};
