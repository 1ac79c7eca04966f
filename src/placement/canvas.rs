use crate::config::GridConfig;
use crate::error::Result;
use crate::geometry::Cell;
use crate::placement::occupancy::OccupancyIndex;
use crate::placement::placer::auto_place;
use crate::tile::{Tile, TileId};

/// Rows kept free below the last occupied row so there is always room to drop.
pub const TRAILING_ROWS: u16 = 2;

/// Everything the rendering layer needs for one frame of the grid canvas.
#[derive(Debug, Clone)]
pub struct CanvasLayout {
    /// Every tile anchored, in collection order.
    pub tiles: Vec<Tile>,
    /// Free cells, row-major, each accepting a drop or a click-to-create.
    pub empty_cells: Vec<Cell>,
    pub max_row: u16,
    /// Rows rendered, including the trailing free rows.
    pub rows: u16,
    pub occupancy: OccupancyIndex,
    /// Tiles the placer could not fit and parked at `(1,1)`.
    pub fallbacks: Vec<TileId>,
}

impl CanvasLayout {
    /// Auto-place unpositioned tiles and synthesize the empty-cell placeholders.
    pub fn compose(tiles: &[Tile], grid: &GridConfig) -> Result<Self> {
        let placed = auto_place(tiles, grid)?;

        let max_row = placed
            .tiles
            .iter()
            .filter_map(|tile| {
                tile.anchor()
                    .map(|anchor| anchor.row.saturating_add(tile.row_span()).saturating_sub(1))
            })
            .max()
            .unwrap_or(1)
            .max(1);
        let rows = max_row.saturating_add(TRAILING_ROWS);
        let empty_cells = empty_cells(&placed.occupancy, grid.columns, rows);

        Ok(Self {
            tiles: placed.tiles,
            empty_cells,
            max_row,
            rows,
            occupancy: placed.occupancy,
            fallbacks: placed.fallbacks,
        })
    }

    pub fn is_empty_cell(&self, cell: Cell) -> bool {
        cell.row <= self.rows && !self.occupancy.is_occupied(cell)
    }
}

/// Every unoccupied cell of a `columns` x `rows` grid, row-major.
pub fn empty_cells(occupancy: &OccupancyIndex, columns: u16, rows: u16) -> Vec<Cell> {
    (1..=rows)
        .flat_map(|row| (1..=columns).map(move |col| Cell::new(col, row)))
        .filter(|cell| !occupancy.is_occupied(*cell))
        .collect()
}
