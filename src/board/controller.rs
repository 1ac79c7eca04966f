use std::sync::Arc;

use serde_json::{Value, json};

use crate::config::EngineConfig;
use crate::error::{PlacementError, Result};
use crate::geometry::Cell;
use crate::logging::{
    AUTO_PLACE_TARGET, GESTURE_TARGET, LogLevel, METRICS_TARGET, RELOCATION_TARGET, cell_kv,
    json_kv,
};
use crate::metrics::PlacementMetrics;
use crate::placement::{
    CanvasLayout, DropTarget, Resolution, auto_place, reading_order, reorder, resolve_move,
};
use crate::tile::{Tile, TileId, TileKind, position_of};

use super::audit::{GestureAuditEventBuilder, GestureAuditStage};
use super::store::{BoardSnapshot, BoardStore, SnapshotTracker};

/// What the pointer is currently hovering while a tile is dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOver {
    Tile(TileId),
    Cell(Cell),
    Slot(usize),
}

/// Transient drag state; cleared after every drop or drag end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    pub dragged: Option<TileId>,
    pub over: Option<DragOver>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    fn clear(&mut self) {
        self.dragged = None;
        self.over = None;
    }
}

/// Pointer gestures supplied by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEvent {
    DragStart(TileId),
    DragEnterTile(TileId),
    DragEnterEmptyCell(Cell),
    DragEnterSlot(usize),
    /// Release over a tile, or `None` to release over whatever is hovered.
    Drop(Option<TileId>),
    DropOnCell(Cell),
    DropAtSlot(usize),
    DragEnd,
    ClickEmptyCell(Cell),
}

/// Result of handling one gesture.
#[derive(Debug, Clone)]
pub enum GestureOutcome {
    /// Drag state changed; the collection did not.
    Tracked,
    /// Gesture did not apply in the current state.
    Ignored,
    Moved(Resolution),
    Reordered { from: usize, to: usize },
    /// Drag abandoned or dropped on nothing.
    Cleared,
    /// Next created tile will be anchored at this cell.
    CellArmed(Cell),
}

/// Owns the authoritative tile collection and turns gestures into new snapshots.
pub struct BoardController {
    tiles: Vec<Tile>,
    config: EngineConfig,
    drag: DragState,
    pending_anchor: Option<Cell>,
    store: Option<Arc<dyn BoardStore>>,
    tracker: SnapshotTracker,
    next_id: u64,
}

impl BoardController {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.grid.validate()?;
        Ok(Self {
            tiles: Vec::new(),
            config,
            drag: DragState::default(),
            pending_anchor: None,
            store: None,
            tracker: SnapshotTracker::new(),
            next_id: 1,
        })
    }

    /// Start from an existing collection.
    pub fn with_tiles(config: EngineConfig, tiles: Vec<Tile>) -> Result<Self> {
        let mut controller = Self::new(config)?;
        for (idx, tile) in tiles.iter().enumerate() {
            if tiles[..idx].iter().any(|t| t.id() == tile.id()) {
                return Err(PlacementError::DuplicateTile(tile.id().clone()));
            }
        }
        controller.tiles = tiles;
        controller
            .tracker
            .observe(&BoardSnapshot::new(controller.tiles.clone()))?;
        Ok(controller)
    }

    /// Load the last saved collection from `store` and keep forwarding to it.
    pub fn open<S>(config: EngineConfig, store: S) -> Result<Self>
    where
        S: BoardStore + 'static,
    {
        let tiles = store.load()?.map(|s| s.tiles).unwrap_or_default();
        let mut controller = Self::with_tiles(config, tiles)?;
        controller.store = Some(Arc::new(store));
        Ok(controller)
    }

    pub fn attach_store<S>(&mut self, store: S)
    where
        S: BoardStore + 'static,
    {
        self.store = Some(Arc::new(store));
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id() == id)
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn pending_anchor(&self) -> Option<Cell> {
        self.pending_anchor
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(self.tiles.clone())
    }

    /// Canvas frame: auto-placed tiles plus empty-cell placeholders.
    /// Auto-placed anchors are only part of the frame, not of the collection.
    pub fn canvas(&self) -> Result<CanvasLayout> {
        CanvasLayout::compose(&self.tiles, &self.config.grid)
    }

    /// Commit the anchors auto placement gives every unpositioned tile, so
    /// they stop moving when other tiles are added. Returns the assignments.
    pub fn pin_auto_placed(&mut self) -> Result<Vec<(TileId, Cell)>> {
        let placed = auto_place(&self.tiles, &self.config.grid)?;
        if placed.assigned.is_empty() {
            return Ok(Vec::new());
        }
        let (assigned, fallbacks) = (placed.assigned.len(), placed.fallbacks.len());
        self.with_metrics(|m| m.record_auto_placed(assigned, fallbacks));
        for (id, cell) in &placed.assigned {
            let fell_back = placed.fallbacks.contains(id);
            let level = if fell_back {
                LogLevel::Warn
            } else {
                LogLevel::Debug
            };
            self.log(
                level,
                AUTO_PLACE_TARGET,
                "tile_auto_placed",
                [
                    json_kv("tile", id.as_str()),
                    cell_kv("to", Some(*cell)),
                    json_kv("fell_back", fell_back),
                ],
            );
        }
        self.commit(placed.tiles)?;
        Ok(placed.assigned)
    }

    /// Linear order used by the compact view.
    pub fn compact_view(&self) -> Vec<Tile> {
        reading_order(&self.tiles)
    }

    pub fn handle(&mut self, event: GestureEvent) -> Result<GestureOutcome> {
        match event {
            GestureEvent::DragStart(id) => {
                if self.tile(&id).is_none() {
                    return Ok(GestureOutcome::Ignored);
                }
                self.audit(
                    GestureAuditEventBuilder::new(GestureAuditStage::DragStarted)
                        .detail("tile", id.as_str()),
                );
                self.drag = DragState {
                    dragged: Some(id),
                    over: None,
                };
                Ok(GestureOutcome::Tracked)
            }
            GestureEvent::DragEnterTile(id) => {
                let accepts = self.drag.dragged.as_ref().is_some_and(|d| *d != id);
                if accepts {
                    Ok(self.hover(DragOver::Tile(id)))
                } else {
                    Ok(GestureOutcome::Ignored)
                }
            }
            GestureEvent::DragEnterEmptyCell(cell) => Ok(self.hover_if_dragging(DragOver::Cell(cell))),
            GestureEvent::DragEnterSlot(index) => Ok(self.hover_if_dragging(DragOver::Slot(index))),
            GestureEvent::Drop(Some(target)) => self.drop_on(DropTarget::Tile(target)),
            GestureEvent::Drop(None) => match self.drag.over.clone() {
                Some(DragOver::Tile(id)) => self.drop_on(DropTarget::Tile(id)),
                Some(DragOver::Cell(cell)) => self.drop_on(DropTarget::Cell(cell)),
                Some(DragOver::Slot(index)) => self.drop_at_slot(index),
                None => Ok(self.clear_drag()),
            },
            GestureEvent::DropOnCell(cell) => self.drop_on(DropTarget::Cell(cell)),
            GestureEvent::DropAtSlot(index) => self.drop_at_slot(index),
            GestureEvent::DragEnd => Ok(self.clear_drag()),
            GestureEvent::ClickEmptyCell(cell) => {
                if self.drag.is_dragging() {
                    return Ok(GestureOutcome::Ignored);
                }
                self.pending_anchor = Some(cell);
                self.audit(
                    GestureAuditEventBuilder::new(GestureAuditStage::CellArmed)
                        .detail("cell", cell.to_string()),
                );
                Ok(GestureOutcome::CellArmed(cell))
            }
        }
    }

    fn hover_if_dragging(&mut self, over: DragOver) -> GestureOutcome {
        if self.drag.is_dragging() {
            self.hover(over)
        } else {
            GestureOutcome::Ignored
        }
    }

    fn hover(&mut self, over: DragOver) -> GestureOutcome {
        if self.drag.over.as_ref() != Some(&over) {
            let label = match &over {
                DragOver::Tile(id) => format!("tile:{id}"),
                DragOver::Cell(cell) => format!("cell:{cell}"),
                DragOver::Slot(index) => format!("slot:{index}"),
            };
            self.audit(
                GestureAuditEventBuilder::new(GestureAuditStage::DragOverChanged)
                    .detail("over", label),
            );
            self.drag.over = Some(over);
        }
        GestureOutcome::Tracked
    }

    fn clear_drag(&mut self) -> GestureOutcome {
        let was_dragging = self.drag.is_dragging();
        self.drag.clear();
        if was_dragging {
            self.audit(GestureAuditEventBuilder::new(GestureAuditStage::DragCleared));
            self.log(LogLevel::Debug, GESTURE_TARGET, "drag_cleared", []);
        }
        GestureOutcome::Cleared
    }

    fn drop_on(&mut self, target: DropTarget) -> Result<GestureOutcome> {
        let Some(dragged) = self.drag.dragged.clone() else {
            self.clear_drag();
            return Ok(GestureOutcome::Ignored);
        };
        let result = self.apply_move(&dragged, &target);
        self.clear_drag();
        result
    }

    fn apply_move(&mut self, dragged: &TileId, target: &DropTarget) -> Result<GestureOutcome> {
        let resolution = resolve_move(&self.tiles, dragged, target, &self.config.grid)?;

        if let Some(reason) = resolution.ignored {
            self.with_metrics(PlacementMetrics::record_ignored_drop);
            self.audit(
                GestureAuditEventBuilder::new(GestureAuditStage::DropIgnored)
                    .detail("tile", dragged.as_str())
                    .detail("reason", format!("{reason:?}")),
            );
            return Ok(GestureOutcome::Moved(resolution));
        }

        let moved_to = resolution
            .tiles
            .iter()
            .find(|t| t.id() == dragged)
            .and_then(Tile::anchor);
        self.audit(
            GestureAuditEventBuilder::new(GestureAuditStage::MoveCommitted)
                .detail("tile", dragged.as_str())
                .detail("to", cell_value(moved_to)),
        );
        self.log(
            LogLevel::Info,
            GESTURE_TARGET,
            "move_committed",
            [
                json_kv("tile", dragged.as_str()),
                cell_kv("to", moved_to),
                json_kv("conflicts", resolution.relocated.len()),
            ],
        );

        for relocated in &resolution.relocated {
            self.audit(
                GestureAuditEventBuilder::new(GestureAuditStage::TileRelocated)
                    .detail("tile", relocated.id.as_str())
                    .detail("from", cell_value(relocated.from))
                    .detail("to", relocated.to.to_string())
                    .detail("fell_back", relocated.fell_back),
            );
            let level = if relocated.fell_back {
                LogLevel::Warn
            } else {
                LogLevel::Debug
            };
            self.log(
                level,
                RELOCATION_TARGET,
                "tile_relocated",
                [
                    json_kv("tile", relocated.id.as_str()),
                    cell_kv("from", relocated.from),
                    cell_kv("to", Some(relocated.to)),
                    json_kv("fell_back", relocated.fell_back),
                ],
            );
        }

        let fallbacks = resolution.fallbacks().count();
        let relocations = resolution.relocated.len();
        self.with_metrics(|m| m.record_move(relocations, fallbacks));
        self.commit(resolution.tiles.clone())?;
        Ok(GestureOutcome::Moved(resolution))
    }

    fn drop_at_slot(&mut self, slot: usize) -> Result<GestureOutcome> {
        let source = self
            .drag
            .dragged
            .as_ref()
            .and_then(|id| position_of(&self.tiles, id));
        let Some(source) = source else {
            self.clear_drag();
            return Ok(GestureOutcome::Ignored);
        };

        let result = reorder(&self.tiles, source, slot);
        self.clear_drag();
        let reordered = result?;

        self.with_metrics(PlacementMetrics::record_reorder);
        self.audit(
            GestureAuditEventBuilder::new(GestureAuditStage::Reordered)
                .detail("from", source)
                .detail("slot", slot),
        );
        self.commit(reordered)?;
        Ok(GestureOutcome::Reordered {
            from: source,
            to: slot,
        })
    }

    /// Create a tile of `kind`, anchored at the armed cell if there is one.
    /// Create a tile of `kind` with its default span and title, anchored at
    /// the armed cell if there is one.
    pub fn add_tile(&mut self, kind: TileKind) -> Result<TileId> {
        let id = self.fresh_id();
        let (cols, rows) = kind.default_span(self.config.grid.columns);
        let tile = Tile::new(id, kind)
            .with_span(cols, rows)?
            .with_field("title", kind.default_title());
        self.insert_tile(tile)
    }

    /// Append a caller-built tile as is. An armed cell is consumed if the tile
    /// has no anchor of its own.
    pub fn insert_tile(&mut self, tile: Tile) -> Result<TileId> {
        if self.tile(tile.id()).is_some() {
            return Err(PlacementError::DuplicateTile(tile.id().clone()));
        }
        let mut tile = tile;
        self.check_span_limit(&tile)?;
        if !tile.is_placed() {
            if let Some(cell) = self.pending_anchor.take() {
                tile = tile.with_anchor(cell)?;
            }
        }

        let id = tile.id().clone();
        self.audit(
            GestureAuditEventBuilder::new(GestureAuditStage::TileCreated)
                .detail("tile", id.as_str())
                .detail("anchor", cell_value(tile.anchor())),
        );
        self.with_metrics(PlacementMetrics::record_created);
        let mut next = self.tiles.clone();
        next.push(tile);
        self.commit(next)?;
        Ok(id)
    }

    /// Replace a tile by id (resize, content edit or manual anchor change).
    pub fn update_tile(&mut self, tile: Tile) -> Result<()> {
        let idx = position_of(&self.tiles, tile.id())
            .ok_or_else(|| PlacementError::TileNotFound(tile.id().clone()))?;
        self.check_span_limit(&tile)?;
        self.audit(
            GestureAuditEventBuilder::new(GestureAuditStage::TileUpdated)
                .detail("tile", tile.id().as_str())
                .detail("span", format!("{}x{}", tile.col_span(), tile.row_span())),
        );
        let mut next = self.tiles.clone();
        next[idx] = tile;
        self.commit(next)
    }

    pub fn delete_tile(&mut self, id: &TileId) -> Result<Tile> {
        let idx =
            position_of(&self.tiles, id).ok_or_else(|| PlacementError::TileNotFound(id.clone()))?;
        if self.drag.dragged.as_ref() == Some(id) {
            self.clear_drag();
        }
        let mut next = self.tiles.clone();
        let removed = next.remove(idx);
        self.audit(
            GestureAuditEventBuilder::new(GestureAuditStage::TileDeleted)
                .detail("tile", id.as_str()),
        );
        self.with_metrics(PlacementMetrics::record_deleted);
        self.commit(next)?;
        Ok(removed)
    }

    /// Log the current metrics snapshot, if metrics are enabled.
    pub fn emit_metrics(&self) {
        let Some(handle) = self.config.metrics.as_ref() else {
            return;
        };
        let Ok(metrics) = handle.lock() else {
            return;
        };
        if let Some(logger) = &self.config.logger {
            let _ = logger.log_event(metrics.snapshot().to_log_event(METRICS_TARGET));
        }
    }

    fn check_span_limit(&self, tile: &Tile) -> Result<()> {
        if tile.col_span() > self.config.grid.columns {
            return Err(PlacementError::InvalidSpan {
                id: tile.id().clone(),
                col_span: tile.col_span(),
                row_span: tile.row_span(),
            });
        }
        Ok(())
    }

    fn fresh_id(&mut self) -> TileId {
        loop {
            let candidate = TileId::new(format!("tile-{}", self.next_id));
            self.next_id += 1;
            if self.tile(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Install a settled collection and forward it to the store if it changed.
    /// The fingerprint is only recorded once the store accepted the snapshot,
    /// so a failed save is retried by the next commit of the same layout.
    fn commit(&mut self, tiles: Vec<Tile>) -> Result<()> {
        self.tiles = tiles;
        let snapshot = self.snapshot();
        let Some(hash) = self.tracker.changed(&snapshot)? else {
            return Ok(());
        };
        if let Some(store) = &self.store {
            store.save(&snapshot)?;
            self.audit(
                GestureAuditEventBuilder::new(GestureAuditStage::SnapshotPersisted)
                    .detail("tiles", snapshot.tiles.len()),
            );
        }
        self.tracker.record(hash);
        Ok(())
    }

    fn with_metrics(&self, update: impl FnOnce(&mut PlacementMetrics)) {
        if let Some(handle) = &self.config.metrics {
            if let Ok(mut metrics) = handle.lock() {
                update(&mut metrics);
            }
        }
    }

    fn audit(&self, builder: GestureAuditEventBuilder) {
        self.config.audit.record(builder.finish());
    }

    fn log<const N: usize>(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        fields: [(String, Value); N],
    ) {
        if let Some(logger) = &self.config.logger {
            let _ = logger.log_with_fields(level, target, message, fields);
        }
    }
}

fn cell_value(cell: Option<Cell>) -> Value {
    cell.map(|c| json!(c.to_string())).unwrap_or(Value::Null)
}
