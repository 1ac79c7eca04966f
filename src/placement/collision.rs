use crate::error::Result;
use crate::geometry::footprint;
use crate::tile::Tile;

/// Whether two tiles share at least one cell.
///
/// Tiles without an anchor are not on the board and never overlap anything.
pub fn overlaps(a: &Tile, b: &Tile, grid_cols: u16) -> Result<bool> {
    match (footprint(a, grid_cols)?, footprint(b, grid_cols)?) {
        (Some(fa), Some(fb)) => Ok(fa.intersects(&fb)),
        _ => Ok(false),
    }
}

/// Tiles other than `moved` whose footprint overlaps it, in collection order.
pub fn conflicts_with<'a>(tiles: &'a [Tile], moved: &Tile, grid_cols: u16) -> Result<Vec<&'a Tile>> {
    let mut conflicts = Vec::new();
    for tile in tiles {
        if tile.id() == moved.id() {
            continue;
        }
        if overlaps(moved, tile, grid_cols)? {
            conflicts.push(tile);
        }
    }
    Ok(conflicts)
}

/// Every overlapping pair, by collection index.
pub fn overlapping_pairs(tiles: &[Tile], grid_cols: u16) -> Result<Vec<(usize, usize)>> {
    let mut pairs = Vec::new();
    for (i, a) in tiles.iter().enumerate() {
        for (j, b) in tiles.iter().enumerate().skip(i + 1) {
            if overlaps(a, b, grid_cols)? {
                pairs.push((i, j));
            }
        }
    }
    Ok(pairs)
}
