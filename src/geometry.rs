//! Discrete grid geometry: cells, footprints and column-span clamping.
//!
//! All coordinates are 1-based. The column count is always passed in by the
//! caller because the same tiles are laid out against different grids (the
//! full canvas and the compact list view).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::tile::Tile;

/// A single grid cell, addressed by 1-based column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: u16,
    pub row: u16,
}

impl Cell {
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Top-left cell of every grid; the last-resort anchor.
    pub const fn origin() -> Self {
        Self { col: 1, row: 1 }
    }

    /// `"col-row"` key used when occupancy is exchanged as strings.
    pub fn key(&self) -> CellKey {
        CellKey(format!("{}-{}", self.col, self.row))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.col, self.row)
    }
}

/// String form of a cell coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(String);

impl CellKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column span after clamping at the right edge of the grid.
///
/// Never less than one, even for anchors past the last column.
pub fn effective_col_span(col_span: u16, anchor_col: u16, grid_cols: u16) -> u16 {
    let room = grid_cols.saturating_sub(anchor_col).saturating_add(1);
    col_span.min(room).max(1)
}

/// Rectangle of cells covered by an anchored tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub anchor: Cell,
    pub cols: u16,
    pub rows: u16,
}

impl Footprint {
    /// Footprint of a `col_span`x`row_span` tile anchored at `anchor`, clamped to `grid_cols`.
    pub fn at(anchor: Cell, col_span: u16, row_span: u16, grid_cols: u16) -> Self {
        Self {
            anchor,
            cols: effective_col_span(col_span, anchor.col, grid_cols),
            rows: row_span.max(1),
        }
    }

    /// First column past the footprint (exclusive).
    pub fn right(&self) -> u16 {
        self.anchor.col.saturating_add(self.cols)
    }

    /// First row past the footprint (exclusive).
    pub fn bottom(&self) -> u16 {
        self.anchor.row.saturating_add(self.rows)
    }

    /// Last row the footprint occupies.
    pub fn last_row(&self) -> u16 {
        self.bottom().saturating_sub(1)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= self.anchor.col
            && cell.col < self.right()
            && cell.row >= self.anchor.row
            && cell.row < self.bottom()
    }

    /// Half-open rectangle intersection; shared edges do not count.
    pub fn intersects(&self, other: &Footprint) -> bool {
        !(self.right() <= other.anchor.col
            || self.anchor.col >= other.right()
            || self.bottom() <= other.anchor.row
            || self.anchor.row >= other.bottom())
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.anchor.row..self.bottom())
            .flat_map(move |row| (self.anchor.col..self.right()).map(move |col| Cell::new(col, row)))
    }
}

/// Reject spans below one and anchors at or below zero.
pub fn check_geometry(tile: &Tile) -> Result<()> {
    if tile.col_span() < 1 || tile.row_span() < 1 {
        return Err(PlacementError::InvalidSpan {
            id: tile.id().clone(),
            col_span: tile.col_span(),
            row_span: tile.row_span(),
        });
    }
    if let Some(anchor) = tile.anchor() {
        if anchor.col == 0 || anchor.row == 0 {
            return Err(PlacementError::InvalidAnchor {
                id: tile.id().clone(),
                col: anchor.col,
                row: anchor.row,
            });
        }
    }
    Ok(())
}

/// Footprint of a tile on a `grid_cols` wide grid, or `None` while it is unpositioned.
pub fn footprint(tile: &Tile, grid_cols: u16) -> Result<Option<Footprint>> {
    check_geometry(tile)?;
    Ok(tile
        .anchor()
        .map(|anchor| Footprint::at(anchor, tile.col_span(), tile.row_span(), grid_cols)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileKind;

    #[test]
    fn clamps_wide_span_at_right_edge() {
        assert_eq!(effective_col_span(5, 2, 3), 2);
        assert_eq!(effective_col_span(1, 3, 3), 1);
        assert_eq!(effective_col_span(3, 1, 3), 3);
    }

    #[test]
    fn anchor_past_edge_keeps_one_column() {
        assert_eq!(effective_col_span(2, 7, 3), 1);
        assert_eq!(effective_col_span(4, 4, 3), 1);
    }

    #[test]
    fn footprint_lists_cells_row_major() {
        let fp = Footprint::at(Cell::new(2, 1), 2, 2, 3);
        let cells: Vec<_> = fp.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(2, 1), Cell::new(3, 1), Cell::new(2, 2), Cell::new(3, 2)]
        );
        assert_eq!(fp.last_row(), 2);
    }

    #[test]
    fn touching_footprints_do_not_intersect() {
        let left = Footprint::at(Cell::new(1, 1), 1, 1, 3);
        let right = Footprint::at(Cell::new(2, 1), 1, 1, 3);
        let below = Footprint::at(Cell::new(1, 2), 2, 1, 3);
        assert!(!left.intersects(&right));
        assert!(!left.intersects(&below));
        assert!(below.intersects(&Footprint::at(Cell::new(2, 2), 1, 3, 3)));
    }

    #[test]
    fn unpositioned_tile_has_no_footprint() {
        let tile = Tile::new("a", TileKind::Text);
        assert!(footprint(&tile, 3).unwrap().is_none());
    }

    #[test]
    fn footprint_uses_clamped_span() {
        let tile = Tile::new("wide", TileKind::Media)
            .with_span(5, 1)
            .unwrap()
            .with_anchor(Cell::new(2, 4))
            .unwrap();
        let fp = footprint(&tile, 3).unwrap().unwrap();
        assert_eq!(fp.cols, 2);
        assert!(fp.contains(Cell::new(3, 4)));
        assert!(!fp.contains(Cell::new(4, 4)));
    }

    #[test]
    fn cell_key_format() {
        assert_eq!(Cell::new(3, 12).key().as_str(), "3-12");
        assert_eq!(Cell::origin().to_string(), "1-1");
    }
}
