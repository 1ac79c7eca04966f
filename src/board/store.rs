use std::sync::Mutex;

use blake3::Hash;
use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::tile::Tile;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Document handed to the persistence collaborator after each settled change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub version: u32,
    pub tiles: Vec<Tile>,
}

impl BoardSnapshot {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            tiles,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Content hash of the tile list in document form.
    pub fn fingerprint(&self) -> Result<Hash> {
        let bytes = serde_json::to_vec(&self.tiles)?;
        Ok(blake3::hash(&bytes))
    }
}

/// Durable storage owned by the caller; the engine only hands it snapshots.
pub trait BoardStore: Send + Sync {
    fn save(&self, snapshot: &BoardSnapshot) -> Result<()>;

    fn load(&self) -> Result<Option<BoardSnapshot>> {
        Ok(None)
    }
}

/// Last snapshot kept in memory, with a save counter.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreState>,
}

#[derive(Debug, Default)]
struct MemoryStoreState {
    latest: Option<BoardSnapshot>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            inner: Mutex::new(MemoryStoreState {
                latest: Some(snapshot),
                saves: 0,
            }),
        }
    }

    pub fn saves(&self) -> usize {
        self.inner.lock().map(|state| state.saves).unwrap_or(0)
    }

    pub fn latest(&self) -> Option<BoardSnapshot> {
        self.inner
            .lock()
            .ok()
            .and_then(|state| state.latest.clone())
    }
}

impl BoardStore for MemoryStore {
    fn save(&self, snapshot: &BoardSnapshot) -> Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| PlacementError::Persistence("memory store poisoned".to_string()))?;
        state.latest = Some(snapshot.clone());
        state.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<BoardSnapshot>> {
        Ok(self.latest())
    }
}

impl<T: BoardStore + ?Sized> BoardStore for std::sync::Arc<T> {
    fn save(&self, snapshot: &BoardSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }

    fn load(&self) -> Result<Option<BoardSnapshot>> {
        (**self).load()
    }
}

/// Remembers the fingerprint of the last forwarded snapshot.
#[derive(Debug, Default)]
pub struct SnapshotTracker {
    last: Option<Hash>,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint of `snapshot` when it differs from the last recorded one.
    /// Nothing is recorded until [`record`](Self::record) is called.
    pub fn changed(&self, snapshot: &BoardSnapshot) -> Result<Option<Hash>> {
        let hash = snapshot.fingerprint()?;
        Ok((self.last != Some(hash)).then_some(hash))
    }

    pub fn record(&mut self, hash: Hash) {
        self.last = Some(hash);
    }

    /// Record `snapshot` and report whether it differs from the previous one.
    pub fn observe(&mut self, snapshot: &BoardSnapshot) -> Result<bool> {
        match self.changed(snapshot)? {
            Some(hash) => {
                self.record(hash);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
