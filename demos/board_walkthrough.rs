//! Scripted walkthrough of a small board: auto placement, a cascading move,
//! a compact-view reorder and click-to-create, with the cell map printed
//! after each step.

use std::sync::Arc;

use bento_grid::logging::MemorySink;
use bento_grid::{
    BoardController, BoardDump, BufferedGestureAudit, Cell, DumpSettings, EngineConfig,
    GestureEvent, GestureOutcome, GridConfig, Logger, MemoryStore, Result, Tile, TileId, TileKind,
};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let sink = MemorySink::new();
    let audit = Arc::new(BufferedGestureAudit::new());
    let store = Arc::new(MemoryStore::new());

    let mut config = EngineConfig::new(GridConfig::canvas())
        .with_logger(Logger::new(sink.clone()))
        .with_audit(Arc::clone(&audit));
    config.enable_metrics();

    let mut board = BoardController::open(config, Arc::clone(&store))?;
    board.insert_tile(Tile::new("hero", TileKind::Media).with_span(2, 2)?)?;
    board.insert_tile(Tile::new("bio", TileKind::Text))?;
    board.insert_tile(Tile::new("mail", TileKind::Link))?;
    board.insert_tile(Tile::new("map", TileKind::Map))?;
    show(&board, "auto placed")?;

    for (id, cell) in board.pin_auto_placed()? {
        println!("pinned {id} at {cell}");
    }

    board.handle(GestureEvent::DragStart(TileId::from("map")))?;
    board.handle(GestureEvent::DragEnterTile(TileId::from("hero")))?;
    if let GestureOutcome::Moved(resolution) = board.handle(GestureEvent::Drop(None))? {
        for relocated in &resolution.relocated {
            println!("relocated {} -> {}", relocated.id, relocated.to);
        }
    }
    show(&board, "map dropped onto hero")?;

    board.handle(GestureEvent::DragStart(TileId::from("mail")))?;
    board.handle(GestureEvent::DropAtSlot(0))?;
    let order: Vec<&str> = board.tiles().iter().map(|t| t.id().as_str()).collect();
    println!("collection order: {}", order.join(", "));

    board.handle(GestureEvent::ClickEmptyCell(Cell::new(3, 5)))?;
    let created = board.add_tile(TileKind::SocialIcon)?;
    println!("created {created} at {:?}", board.tile(&created).and_then(Tile::anchor));
    show(&board, "after click-to-create")?;

    board.emit_metrics();
    println!("log: {}", sink.messages().join(", "));
    println!("audit stages: {:?}", audit.stages());
    println!("snapshots saved: {}", store.saves());
    Ok(())
}

fn show(board: &BoardController, title: &str) -> Result<()> {
    let canvas = board.canvas()?;
    let dump = BoardDump::new(DumpSettings { cell_width: 5 });
    println!("-- {title} ({} rows, {} free cells)", canvas.rows, canvas.empty_cells.len());
    dump.render(&mut std::io::stdout(), &canvas.tiles, board.config().grid.columns)
}
