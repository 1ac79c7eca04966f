use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PlacementError, Result};
use crate::geometry::{Cell, check_geometry};

/// Stable opaque tile identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Content category of a tile. Placement only looks at it for default spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileKind {
    Link,
    Text,
    Media,
    Social,
    SocialIcon,
    Map,
    Spacer,
}

impl TileKind {
    /// Span a freshly created tile of this kind receives on a `grid_cols` wide grid.
    pub fn default_span(self, grid_cols: u16) -> (u16, u16) {
        match self {
            TileKind::Spacer => (grid_cols.max(1), 1),
            _ => (1, 1),
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            TileKind::Social => "X",
            TileKind::Map => "Location",
            TileKind::Spacer => "Spacer",
            _ => "New Block",
        }
    }
}

/// Content fields carried through untouched (title, media, link target, ...).
pub type TilePayload = Map<String, Value>;

/// Unit placed on the grid.
///
/// Geometry is private so a tile can only exist with spans of at least one and
/// either a complete positive anchor or none at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TileRecord", into = "TileRecord")]
pub struct Tile {
    id: TileId,
    kind: TileKind,
    col_span: u16,
    row_span: u16,
    anchor: Option<Cell>,
    z_index: Option<i32>,
    pub payload: TilePayload,
}

impl Tile {
    /// Unpositioned 1x1 tile.
    pub fn new(id: impl Into<TileId>, kind: TileKind) -> Self {
        Self {
            id: id.into(),
            kind,
            col_span: 1,
            row_span: 1,
            anchor: None,
            z_index: None,
            payload: TilePayload::new(),
        }
    }

    pub fn with_span(mut self, col_span: u16, row_span: u16) -> Result<Self> {
        self.col_span = col_span;
        self.row_span = row_span;
        check_geometry(&self)?;
        Ok(self)
    }

    pub fn with_anchor(mut self, anchor: Cell) -> Result<Self> {
        self.anchor = Some(anchor);
        check_geometry(&self)?;
        Ok(self)
    }

    pub fn unplaced(mut self) -> Self {
        self.anchor = None;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &TileId {
        &self.id
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn col_span(&self) -> u16 {
        self.col_span
    }

    pub fn row_span(&self) -> u16 {
        self.row_span
    }

    pub fn anchor(&self) -> Option<Cell> {
        self.anchor
    }

    pub fn z_index(&self) -> Option<i32> {
        self.z_index
    }

    pub fn is_placed(&self) -> bool {
        self.anchor.is_some()
    }

    /// Copy of this tile moved to `anchor`. Anchors handed out by the placer are
    /// always positive so no re-validation is needed.
    pub(crate) fn placed_at(&self, anchor: Cell) -> Self {
        Self {
            anchor: Some(anchor),
            ..self.clone()
        }
    }
}

/// Document shape shared with the builder's saved bentos and exported sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileRecord {
    id: TileId,
    #[serde(rename = "type")]
    kind: TileKind,
    col_span: u16,
    row_span: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_column: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_row: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    z_index: Option<i32>,
    #[serde(flatten)]
    payload: TilePayload,
}

impl TryFrom<TileRecord> for Tile {
    type Error = PlacementError;

    fn try_from(record: TileRecord) -> Result<Self> {
        // Half an anchor means "not on the board yet".
        let anchor = match (record.grid_column, record.grid_row) {
            (Some(col), Some(row)) => Some(Cell::new(col, row)),
            _ => None,
        };
        let tile = Tile {
            id: record.id,
            kind: record.kind,
            col_span: record.col_span,
            row_span: record.row_span,
            anchor,
            z_index: record.z_index,
            payload: record.payload,
        };
        check_geometry(&tile)?;
        Ok(tile)
    }
}

impl From<Tile> for TileRecord {
    fn from(tile: Tile) -> Self {
        TileRecord {
            id: tile.id,
            kind: tile.kind,
            col_span: tile.col_span,
            row_span: tile.row_span,
            grid_column: tile.anchor.map(|a| a.col),
            grid_row: tile.anchor.map(|a| a.row),
            z_index: tile.z_index,
            payload: tile.payload,
        }
    }
}

/// Index of the tile with `id` in `tiles`.
pub fn position_of(tiles: &[Tile], id: &TileId) -> Option<usize> {
    tiles.iter().position(|tile| tile.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_span_is_rejected_at_construction() {
        let err = Tile::new("a", TileKind::Link).with_span(0, 1).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidSpan { col_span: 0, .. }));
    }

    #[test]
    fn zero_anchor_is_rejected_at_construction() {
        let err = Tile::new("a", TileKind::Link)
            .with_anchor(Cell::new(0, 2))
            .unwrap_err();
        assert!(matches!(err, PlacementError::InvalidAnchor { col: 0, row: 2, .. }));
    }

    #[test]
    fn spacer_spans_full_width() {
        assert_eq!(TileKind::Spacer.default_span(3), (3, 1));
        assert_eq!(TileKind::Map.default_span(3), (1, 1));
        assert_eq!(TileKind::Map.default_title(), "Location");
    }

    #[test]
    fn record_round_trips_builder_field_names() {
        let value = json!({
            "id": "k2j",
            "type": "SOCIAL_ICON",
            "colSpan": 2,
            "rowSpan": 1,
            "gridColumn": 2,
            "gridRow": 3,
            "zIndex": 4,
            "title": "GitHub",
            "socialHandle": "octocat"
        });
        let tile: Tile = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(tile.kind(), TileKind::SocialIcon);
        assert_eq!(tile.anchor(), Some(Cell::new(2, 3)));
        assert_eq!(tile.z_index(), Some(4));
        assert_eq!(tile.payload["socialHandle"], json!("octocat"));

        assert_eq!(serde_json::to_value(&tile).unwrap(), value);
    }

    #[test]
    fn half_anchor_loads_unpositioned() {
        let tile: Tile = serde_json::from_value(json!({
            "id": "x",
            "type": "TEXT",
            "colSpan": 1,
            "rowSpan": 1,
            "gridColumn": 2
        }))
        .unwrap();
        assert!(!tile.is_placed());
    }

    #[test]
    fn invalid_record_fails_to_load() {
        let result: std::result::Result<Tile, _> = serde_json::from_value(json!({
            "id": "x",
            "type": "TEXT",
            "colSpan": 0,
            "rowSpan": 1
        }));
        assert!(result.is_err());
    }
}
