use std::sync::Arc;

use proptest::prelude::*;
use proptest::sample::Index;

use bento_grid::placement::{CanvasLayout, overlapping_pairs};
use bento_grid::{
    BoardController, Cell, DropTarget, EngineConfig, Footprint, GestureEvent, GestureOutcome,
    GridConfig, MemoryStore, OccupancyIndex, RowProbe, Tile, TileId, TileKind, auto_place,
    effective_col_span, place, reorder, resolve_move,
};

fn placed(id: &str, col: u16, row: u16, cols: u16, rows: u16) -> Tile {
    Tile::new(id, TileKind::Text)
        .with_span(cols, rows)
        .unwrap()
        .with_anchor(Cell::new(col, row))
        .unwrap()
}

fn anchor_of(tiles: &[Tile], id: &str) -> Option<Cell> {
    tiles
        .iter()
        .find(|t| t.id().as_str() == id)
        .and_then(Tile::anchor)
}

fn ids(tiles: &[Tile]) -> Vec<&str> {
    tiles.iter().map(|t| t.id().as_str()).collect()
}

fn board_of_spans(spans: &[(u16, u16)]) -> Vec<Tile> {
    spans
        .iter()
        .enumerate()
        .map(|(idx, &(cols, rows))| {
            Tile::new(format!("t{idx}"), TileKind::Text)
                .with_span(cols, rows)
                .unwrap()
        })
        .collect()
}

#[derive(Debug, Clone)]
enum MoveTo {
    Tile(Index),
    Cell(u16, u16),
}

fn move_strategy() -> impl Strategy<Value = (Index, MoveTo)> {
    let target = prop_oneof![
        any::<Index>().prop_map(MoveTo::Tile),
        (1u16..=3, 1u16..=8).prop_map(|(col, row)| MoveTo::Cell(col, row)),
    ];
    (any::<Index>(), target)
}

proptest! {
    #[test]
    fn auto_placed_and_relocated_boards_never_overlap(
        spans in prop::collection::vec((1u16..=3, 1u16..=2), 1..12),
        moves in prop::collection::vec(move_strategy(), 0..10),
    ) {
        let grid = GridConfig::canvas().with_probe(RowProbe::Unbounded);
        let mut tiles = auto_place(&board_of_spans(&spans), &grid).unwrap().tiles;
        prop_assert!(overlapping_pairs(&tiles, grid.columns).unwrap().is_empty());

        for (dragged, to) in moves {
            let dragged = dragged.get(&tiles).id().clone();
            let target = match to {
                MoveTo::Tile(idx) => DropTarget::Tile(idx.get(&tiles).id().clone()),
                MoveTo::Cell(col, row) => DropTarget::Cell(Cell::new(col, row)),
            };
            let resolution = resolve_move(&tiles, &dragged, &target, &grid).unwrap();
            prop_assert_eq!(resolution.fallbacks().count(), 0);
            tiles = resolution.tiles;
            prop_assert!(
                overlapping_pairs(&tiles, grid.columns).unwrap().is_empty(),
                "overlap after moving {} to {:?}",
                dragged,
                target
            );
        }
    }
}

#[test]
fn place_is_idempotent() {
    let grid = GridConfig::canvas();
    let tiles = vec![placed("a", 1, 1, 2, 1), placed("b", 3, 1, 1, 2)];
    let occupancy = OccupancyIndex::build(&tiles, &[], grid.columns).unwrap();
    let newcomer = Tile::new("c", TileKind::Link).with_span(2, 1).unwrap();

    let first = place(&newcomer, &occupancy, &grid).unwrap();
    let second = place(&newcomer, &occupancy, &grid).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Cell::new(1, 2));
}

#[test]
fn wide_span_is_clamped_at_the_right_edge() {
    assert_eq!(effective_col_span(5, 2, 3), 2);
    let footprint = Footprint::at(Cell::new(2, 1), 5, 1, 3);
    assert_eq!(footprint.cols, 2);
    assert!(!footprint.contains(Cell::new(4, 1)));
}

#[test]
fn cascading_relocation_is_deterministic() {
    let grid = GridConfig::canvas();
    let tiles = vec![
        placed("a", 1, 1, 1, 1),
        placed("b", 2, 1, 1, 1),
        placed("c", 3, 1, 1, 1),
    ];

    let first = resolve_move(&tiles, &TileId::from("c"), &DropTarget::Tile(TileId::from("a")), &grid)
        .unwrap();
    assert_eq!(anchor_of(&first.tiles, "c"), Some(Cell::new(1, 1)));
    assert_eq!(anchor_of(&first.tiles, "b"), Some(Cell::new(2, 1)));
    assert_eq!(anchor_of(&first.tiles, "a"), Some(Cell::new(3, 1)));

    for _ in 0..5 {
        let again =
            resolve_move(&tiles, &TileId::from("c"), &DropTarget::Tile(TileId::from("a")), &grid)
                .unwrap();
        assert_eq!(again.tiles, first.tiles);
    }
}

#[test]
fn empty_cells_cover_the_rest_of_the_canvas_once() {
    let tiles = vec![
        placed("a", 1, 1, 1, 1),
        placed("b", 2, 1, 1, 1),
        placed("c", 1, 2, 1, 1),
    ];
    let canvas = CanvasLayout::compose(&tiles, &GridConfig::canvas()).unwrap();
    assert_eq!(canvas.max_row, 2);
    assert_eq!(canvas.rows, 4);

    let mut expected = Vec::new();
    for row in 1..=4 {
        for col in 1..=3 {
            let cell = Cell::new(col, row);
            if ![Cell::new(1, 1), Cell::new(2, 1), Cell::new(1, 2)].contains(&cell) {
                expected.push(cell);
            }
        }
    }
    assert_eq!(canvas.empty_cells, expected);
}

#[test]
fn reorder_accounts_for_the_removed_index() {
    let tiles = vec![
        Tile::new("a", TileKind::Text),
        Tile::new("b", TileKind::Text),
        Tile::new("c", TileKind::Text),
        Tile::new("d", TileKind::Text),
    ];
    let reordered = reorder(&tiles, 0, 3).unwrap();
    assert_eq!(ids(&reordered), ["b", "c", "a", "d"]);
}

#[test]
fn tiles_added_to_an_empty_board_fill_row_major() {
    let mut board = BoardController::new(EngineConfig::default()).unwrap();
    for _ in 0..4 {
        board.add_tile(TileKind::Text).unwrap();
    }
    let canvas = board.canvas().unwrap();
    let anchors: Vec<Cell> = canvas.tiles.iter().filter_map(Tile::anchor).collect();
    assert_eq!(
        anchors,
        [
            Cell::new(1, 1),
            Cell::new(2, 1),
            Cell::new(3, 1),
            Cell::new(1, 2)
        ]
    );
}

#[test]
fn gesture_cascade_is_saved_once_per_change() {
    let store = Arc::new(MemoryStore::new());
    let mut board = BoardController::with_tiles(
        EngineConfig::default(),
        vec![
            placed("a", 1, 1, 1, 1),
            placed("b", 2, 1, 1, 1),
            placed("c", 3, 1, 1, 1),
        ],
    )
    .unwrap();
    board.attach_store(Arc::clone(&store));

    board.handle(GestureEvent::DragStart(TileId::from("c"))).unwrap();
    board
        .handle(GestureEvent::DragEnterTile(TileId::from("a")))
        .unwrap();
    let outcome = board.handle(GestureEvent::Drop(None)).unwrap();
    assert!(matches!(outcome, GestureOutcome::Moved(ref r) if r.is_committed()));
    assert!(!board.drag_state().is_dragging());
    assert_eq!(store.saves(), 1);

    // Dropping a tile on itself changes nothing and saves nothing.
    board.handle(GestureEvent::DragStart(TileId::from("b"))).unwrap();
    board
        .handle(GestureEvent::Drop(Some(TileId::from("b"))))
        .unwrap();
    assert!(!board.drag_state().is_dragging());
    assert_eq!(store.saves(), 1);

    let saved = store.latest().unwrap();
    assert_eq!(anchor_of(&saved.tiles, "a"), Some(Cell::new(3, 1)));
}
