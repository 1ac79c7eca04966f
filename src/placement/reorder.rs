use crate::error::{PlacementError, Result};
use crate::tile::Tile;

/// Move the tile at `source` so it lands in the slot that was at `target_slot`
/// before removal. Coordinates are left alone.
pub fn reorder(tiles: &[Tile], source: usize, target_slot: usize) -> Result<Vec<Tile>> {
    let len = tiles.len();
    if source >= len {
        return Err(PlacementError::SlotOutOfRange { index: source, len });
    }
    if target_slot > len {
        return Err(PlacementError::SlotOutOfRange {
            index: target_slot,
            len,
        });
    }

    let mut next = tiles.to_vec();
    let moved = next.remove(source);
    let slot = if source < target_slot {
        target_slot - 1
    } else {
        target_slot
    };
    next.insert(slot, moved);
    Ok(next)
}

/// Reading order for linear views: by row, then column, unpositioned tiles last.
/// Ties keep collection order.
pub fn reading_order(tiles: &[Tile]) -> Vec<Tile> {
    let mut sorted = tiles.to_vec();
    sorted.sort_by_key(|tile| match tile.anchor() {
        Some(cell) => (0, cell.row, cell.col),
        None => (1, 0, 0),
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Cell;
    use crate::tile::TileKind;

    fn ids(tiles: &[Tile]) -> Vec<&str> {
        tiles.iter().map(|t| t.id().as_str()).collect()
    }

    fn list() -> Vec<Tile> {
        ["a", "b", "c", "d"]
            .iter()
            .map(|id| Tile::new(*id, TileKind::Link))
            .collect()
    }

    #[test]
    fn forward_move_compensates_for_removal() {
        let out = reorder(&list(), 0, 3).unwrap();
        assert_eq!(ids(&out), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn backward_move_inserts_before_slot() {
        let out = reorder(&list(), 3, 1).unwrap();
        assert_eq!(ids(&out), vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn slot_past_end_appends() {
        let out = reorder(&list(), 1, 4).unwrap();
        assert_eq!(ids(&out), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn same_slot_is_identity() {
        let out = reorder(&list(), 2, 2).unwrap();
        assert_eq!(ids(&out), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn out_of_range_indices_fail() {
        assert!(matches!(
            reorder(&list(), 4, 0),
            Err(PlacementError::SlotOutOfRange { index: 4, len: 4 })
        ));
        assert!(reorder(&list(), 0, 5).is_err());
    }

    #[test]
    fn reading_order_sorts_rows_then_columns() {
        let tiles = vec![
            Tile::new("loose", TileKind::Text),
            Tile::new("b", TileKind::Text).with_anchor(Cell::new(1, 2)).unwrap(),
            Tile::new("a", TileKind::Text).with_anchor(Cell::new(3, 1)).unwrap(),
            Tile::new("first", TileKind::Text).with_anchor(Cell::new(1, 1)).unwrap(),
        ];
        assert_eq!(ids(&reading_order(&tiles)), vec!["first", "a", "b", "loose"]);
    }
}
