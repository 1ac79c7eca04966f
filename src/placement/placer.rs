use crate::config::{GridConfig, RowProbe};
use crate::error::{PlacementError, Result};
use crate::geometry::{Cell, Footprint, check_geometry};
use crate::placement::occupancy::OccupancyIndex;
use crate::tile::{Tile, TileId};

/// Outcome of a placement that may have used the `(1,1)` fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub cell: Cell,
    pub fell_back: bool,
}

/// First-fit anchor for `tile`: row-major scan from `(1,1)`, returning the
/// first anchor whose clamped footprint touches no occupied cell.
pub fn place(tile: &Tile, occupied: &OccupancyIndex, grid: &GridConfig) -> Result<Cell> {
    check_geometry(tile)?;
    let cols = grid.columns.max(1);
    let needed = tile.col_span().min(cols);
    let last_col = cols - needed + 1;
    let row_limit = match grid.probe {
        RowProbe::Rows(rows) => rows,
        // Past the lowest occupied row everything is free.
        RowProbe::Unbounded => occupied.max_row().saturating_add(1),
    };

    for row in 1..=row_limit {
        for col in 1..=last_col {
            let anchor = Cell::new(col, row);
            let fp = Footprint::at(anchor, needed, tile.row_span(), cols);
            if occupied.is_free(&fp) {
                return Ok(anchor);
            }
        }
    }

    Err(PlacementError::PlacementExhausted {
        id: tile.id().clone(),
        rows_probed: row_limit,
    })
}

/// [`place`], falling back to `(1,1)` when the probe is exhausted so the tile
/// stays on the board (overlapping) instead of being lost.
pub fn place_or_fallback(tile: &Tile, occupied: &OccupancyIndex, grid: &GridConfig) -> Result<Placement> {
    match place(tile, occupied, grid) {
        Ok(cell) => Ok(Placement {
            cell,
            fell_back: false,
        }),
        Err(PlacementError::PlacementExhausted { .. }) => Ok(Placement {
            cell: Cell::origin(),
            fell_back: true,
        }),
        Err(err) => Err(err),
    }
}

/// Result of positioning every unpositioned tile in a collection.
#[derive(Debug, Clone)]
pub struct AutoPlacement {
    /// Same order as the input, every tile anchored.
    pub tiles: Vec<Tile>,
    pub assigned: Vec<(TileId, Cell)>,
    /// Tiles that landed on `(1,1)` after the probe was exhausted.
    pub fallbacks: Vec<TileId>,
    /// Occupancy of the final layout.
    pub occupancy: OccupancyIndex,
}

/// Anchor every unpositioned tile in collection order. Each assignment is
/// claimed before the next tile is probed, so later tiles never reuse cells
/// taken by earlier ones.
pub fn auto_place(tiles: &[Tile], grid: &GridConfig) -> Result<AutoPlacement> {
    let mut occupancy = OccupancyIndex::build(tiles, &[], grid.columns)?;
    let mut placed = Vec::with_capacity(tiles.len());
    let mut assigned = Vec::new();
    let mut fallbacks = Vec::new();

    for tile in tiles {
        if tile.is_placed() {
            placed.push(tile.clone());
            continue;
        }
        let placement = place_or_fallback(tile, &occupancy, grid)?;
        occupancy.claim(&Footprint::at(
            placement.cell,
            tile.col_span(),
            tile.row_span(),
            grid.columns,
        ));
        if placement.fell_back {
            fallbacks.push(tile.id().clone());
        }
        assigned.push((tile.id().clone(), placement.cell));
        placed.push(tile.placed_at(placement.cell));
    }

    Ok(AutoPlacement {
        tiles: placed,
        assigned,
        fallbacks,
        occupancy,
    })
}
