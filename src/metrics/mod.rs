use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated by a board controller.
#[derive(Debug, Default, Clone)]
pub struct PlacementMetrics {
    moves: u64,
    ignored_drops: u64,
    relocations: u64,
    fallbacks: u64,
    reorders: u64,
    auto_placed: u64,
    tiles_created: u64,
    tiles_deleted: u64,
}

impl PlacementMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_move(&mut self, relocated: usize, fallbacks: usize) {
        self.moves = self.moves.saturating_add(1);
        self.relocations = self.relocations.saturating_add(relocated as u64);
        self.fallbacks = self.fallbacks.saturating_add(fallbacks as u64);
    }

    pub fn record_ignored_drop(&mut self) {
        self.ignored_drops = self.ignored_drops.saturating_add(1);
    }

    pub fn record_reorder(&mut self) {
        self.reorders = self.reorders.saturating_add(1);
    }

    pub fn record_auto_placed(&mut self, count: usize, fallbacks: usize) {
        self.auto_placed = self.auto_placed.saturating_add(count as u64);
        self.fallbacks = self.fallbacks.saturating_add(fallbacks as u64);
    }

    pub fn record_created(&mut self) {
        self.tiles_created = self.tiles_created.saturating_add(1);
    }

    pub fn record_deleted(&mut self) {
        self.tiles_deleted = self.tiles_deleted.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            moves: self.moves,
            ignored_drops: self.ignored_drops,
            relocations: self.relocations,
            fallbacks: self.fallbacks,
            reorders: self.reorders,
            auto_placed: self.auto_placed,
            tiles_created: self.tiles_created,
            tiles_deleted: self.tiles_deleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub moves: u64,
    pub ignored_drops: u64,
    pub relocations: u64,
    pub fallbacks: u64,
    pub reorders: u64,
    pub auto_placed: u64,
    pub tiles_created: u64,
    pub tiles_deleted: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("moves".to_string(), json!(self.moves));
        map.insert("ignored_drops".to_string(), json!(self.ignored_drops));
        map.insert("relocations".to_string(), json!(self.relocations));
        map.insert("fallbacks".to_string(), json!(self.fallbacks));
        map.insert("reorders".to_string(), json!(self.reorders));
        map.insert("auto_placed".to_string(), json!(self.auto_placed));
        map.insert("tiles_created".to_string(), json!(self.tiles_created));
        map.insert("tiles_deleted".to_string(), json!(self.tiles_deleted));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "placement_metrics", self.as_fields())
    }
}
