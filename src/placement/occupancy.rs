use std::collections::HashSet;

use crate::error::Result;
use crate::geometry::{Cell, CellKey, Footprint, footprint};
use crate::tile::{Tile, TileId};

/// Set of cells covered by positioned tiles.
///
/// Always rebuilt from a tile list; never patched incrementally except by the
/// placer claiming cells within a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyIndex {
    cells: HashSet<Cell>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of the footprints of every positioned tile not listed in `exclude`.
    pub fn build(tiles: &[Tile], exclude: &[&TileId], grid_cols: u16) -> Result<Self> {
        let mut index = Self::new();
        for tile in tiles {
            if exclude.contains(&tile.id()) {
                continue;
            }
            if let Some(fp) = footprint(tile, grid_cols)? {
                index.claim(&fp);
            }
        }
        Ok(index)
    }

    pub fn claim(&mut self, footprint: &Footprint) {
        self.cells.extend(footprint.cells());
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Whether none of the footprint's cells are taken.
    pub fn is_free(&self, footprint: &Footprint) -> bool {
        footprint.cells().all(|cell| !self.cells.contains(&cell))
    }

    /// Lowest occupied row, or zero for an empty index.
    pub fn max_row(&self) -> u16 {
        self.cells.iter().map(|cell| cell.row).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// `"col-row"` keys, sorted for stable output.
    pub fn keys(&self) -> Vec<CellKey> {
        let mut sorted: Vec<_> = self.cells.iter().copied().collect();
        sorted.sort_by_key(|cell| (cell.row, cell.col));
        sorted.iter().map(Cell::key).collect()
    }
}
