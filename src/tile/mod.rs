//! Tile data model.
//!
//! Placement code imports tile types from here; the document mapping lives in
//! the private `core` module next to the type it serializes.

mod core;

pub use core::{Tile, TileId, TileKind, TilePayload, position_of};
