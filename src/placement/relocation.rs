//! Cascading relocation after an explicit move.
//!
//! A move is driven through `Idle -> Moved -> Resolving -> Settled`. The moved
//! tile keeps its new anchor unconditionally; every tile it now overlaps is
//! re-placed one at a time against the board as it stands after the previous
//! relocation, so two displaced tiles can never land on the same cell.

use std::collections::VecDeque;

use crate::config::GridConfig;
use crate::error::{PlacementError, Result};
use crate::geometry::Cell;
use crate::placement::collision::conflicts_with;
use crate::placement::occupancy::OccupancyIndex;
use crate::placement::placer::place_or_fallback;
use crate::tile::{Tile, TileId, position_of};

/// Lifecycle of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Idle,
    Moved,
    Resolving,
    Settled,
}

/// Where a dragged tile was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Onto another tile; the dragged tile takes that tile's anchor.
    Tile(TileId),
    /// Onto an empty cell placeholder.
    Cell(Cell),
}

/// Why a drop left the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredDrop {
    DraggedMissing,
    TargetMissing,
    SelfDrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommit {
    Committed,
    Ignored(IgnoredDrop),
}

/// A tile displaced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocated {
    pub id: TileId,
    pub from: Option<Cell>,
    pub to: Cell,
    /// Landed on `(1,1)` because no free cell was found.
    pub fell_back: bool,
}

/// Settled outcome of a move.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tiles: Vec<Tile>,
    /// Tile the user moved, if the drop was committed.
    pub moved: Option<TileId>,
    pub ignored: Option<IgnoredDrop>,
    pub relocated: Vec<Relocated>,
    /// States visited, in order.
    pub trace: Vec<ResolverState>,
}

impl Resolution {
    pub fn is_committed(&self) -> bool {
        self.moved.is_some()
    }

    pub fn fallbacks(&self) -> impl Iterator<Item = &Relocated> {
        self.relocated.iter().filter(|r| r.fell_back)
    }
}

pub struct RelocationResolver {
    grid: GridConfig,
    state: ResolverState,
    tiles: Vec<Tile>,
    moved: Option<TileId>,
    ignored: Option<IgnoredDrop>,
    relocated: Vec<Relocated>,
    trace: Vec<ResolverState>,
}

impl RelocationResolver {
    /// Start from a snapshot of the collection; the input is never mutated.
    pub fn new(tiles: &[Tile], grid: GridConfig) -> Self {
        Self {
            grid,
            state: ResolverState::Idle,
            tiles: tiles.to_vec(),
            moved: None,
            ignored: None,
            relocated: Vec::new(),
            trace: vec![ResolverState::Idle],
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    fn transition(&mut self, to: ResolverState) -> Result<()> {
        let allowed = matches!(
            (self.state, to),
            (ResolverState::Idle, ResolverState::Moved)
                | (ResolverState::Moved, ResolverState::Resolving)
                | (ResolverState::Resolving, ResolverState::Settled)
                | (ResolverState::Idle, ResolverState::Settled)
        );
        if !allowed {
            return Err(PlacementError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        self.trace.push(to);
        Ok(())
    }

    /// Apply the user's move. Ignored drops leave the resolver idle.
    pub fn commit_move(&mut self, dragged: &TileId, target: &DropTarget) -> Result<MoveCommit> {
        if self.state != ResolverState::Idle {
            return Err(PlacementError::InvalidTransition {
                from: self.state,
                to: ResolverState::Moved,
            });
        }

        let Some(source_idx) = position_of(&self.tiles, dragged) else {
            return Ok(self.ignore(IgnoredDrop::DraggedMissing));
        };

        let anchor = match target {
            DropTarget::Tile(target_id) if target_id == dragged => {
                return Ok(self.ignore(IgnoredDrop::SelfDrop));
            }
            DropTarget::Tile(target_id) => match position_of(&self.tiles, target_id) {
                Some(idx) => self.tiles[idx].anchor(),
                None => return Ok(self.ignore(IgnoredDrop::TargetMissing)),
            },
            DropTarget::Cell(cell) => Some(*cell),
        };

        let source = self.tiles[source_idx].clone();
        self.tiles[source_idx] = match anchor {
            Some(cell) => source.with_anchor(cell)?,
            None => source.unplaced(),
        };
        self.moved = Some(dragged.clone());
        self.transition(ResolverState::Moved)?;
        Ok(MoveCommit::Committed)
    }

    fn ignore(&mut self, reason: IgnoredDrop) -> MoveCommit {
        self.ignored = Some(reason);
        MoveCommit::Ignored(reason)
    }

    /// Relocate every tile overlapping the moved tile, in collection order.
    pub fn resolve(&mut self) -> Result<&[Relocated]> {
        self.transition(ResolverState::Resolving)?;
        let Some(moved_id) = self.moved.clone() else {
            return Ok(&self.relocated);
        };
        let Some(moved_idx) = position_of(&self.tiles, &moved_id) else {
            return Ok(&self.relocated);
        };

        let cols = self.grid.columns;
        let mut pending: VecDeque<TileId> =
            conflicts_with(&self.tiles, &self.tiles[moved_idx], cols)?
                .into_iter()
                .map(|tile| tile.id().clone())
                .collect();

        while let Some(conflict_id) = pending.pop_front() {
            let Some(idx) = position_of(&self.tiles, &conflict_id) else {
                continue;
            };
            let occupied = OccupancyIndex::build(&self.tiles, &[&conflict_id], cols)?;
            let placement = place_or_fallback(&self.tiles[idx], &occupied, &self.grid)?;
            let from = self.tiles[idx].anchor();
            self.tiles[idx] = self.tiles[idx].placed_at(placement.cell);
            self.relocated.push(Relocated {
                id: conflict_id,
                from,
                to: placement.cell,
                fell_back: placement.fell_back,
            });
        }

        Ok(&self.relocated)
    }

    /// Finish the move and hand back the new collection.
    pub fn settle(mut self) -> Result<Resolution> {
        self.transition(ResolverState::Settled)?;
        Ok(Resolution {
            tiles: self.tiles,
            moved: self.moved,
            ignored: self.ignored,
            relocated: self.relocated,
            trace: self.trace,
        })
    }
}

/// Run a whole move: commit, resolve conflicts and settle.
pub fn resolve_move(
    tiles: &[Tile],
    dragged: &TileId,
    target: &DropTarget,
    grid: &GridConfig,
) -> Result<Resolution> {
    let mut resolver = RelocationResolver::new(tiles, *grid);
    if resolver.commit_move(dragged, target)? == MoveCommit::Committed {
        resolver.resolve()?;
    }
    resolver.settle()
}
