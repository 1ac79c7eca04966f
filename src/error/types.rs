use thiserror::Error;

use crate::placement::relocation::ResolverState;
use crate::tile::TileId;

/// Unified result type for the placement engine.
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Errors surfaced by the placement engine.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("tile `{id}` has invalid span {col_span}x{row_span}")]
    InvalidSpan {
        id: TileId,
        col_span: u16,
        row_span: u16,
    },
    #[error("tile `{id}` has invalid anchor ({col}, {row})")]
    InvalidAnchor { id: TileId, col: u16, row: u16 },
    #[error("no free position for tile `{id}` within {rows_probed} rows")]
    PlacementExhausted { id: TileId, rows_probed: u16 },
    #[error("tile `{0}` not found")]
    TileNotFound(TileId),
    #[error("tile `{0}` already exists")]
    DuplicateTile(TileId),
    #[error("slot {index} out of range for {len} tiles")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("invalid resolver transition {from:?} -> {to:?}")]
    InvalidTransition {
        from: ResolverState,
        to: ResolverState,
    },
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error(transparent)]
    Snapshot(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlacementError {
    /// Whether the caller can recover by falling back or retrying with other inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PlacementExhausted { .. })
    }
}
