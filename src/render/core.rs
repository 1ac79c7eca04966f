use std::io::Write;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::Result;
use crate::geometry::footprint;
use crate::tile::Tile;

const EMPTY: &str = ".";
const OVERLAP: &str = "*";

/// Dump parameters.
#[derive(Debug, Clone)]
pub struct DumpSettings {
    /// Display columns per grid cell.
    pub cell_width: u16,
}

impl Default for DumpSettings {
    fn default() -> Self {
        Self { cell_width: 6 }
    }
}

/// Plain-text cell map of a tile collection, one line per grid row.
///
/// Cells show the covering tile's id, `.` when free and `*` when more than
/// one tile claims them. Tiles are drawn where they are, without auto
/// placement, so injected overlaps stay visible.
pub struct BoardDump {
    settings: DumpSettings,
}

impl BoardDump {
    pub fn new(settings: DumpSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(DumpSettings::default())
    }

    pub fn render(&self, writer: &mut impl Write, tiles: &[Tile], grid_cols: u16) -> Result<()> {
        for line in self.lines(tiles, grid_cols)? {
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_text(&self, tiles: &[Tile], grid_cols: u16) -> Result<String> {
        Ok(self.lines(tiles, grid_cols)?.join("\n"))
    }

    fn lines(&self, tiles: &[Tile], grid_cols: u16) -> Result<Vec<String>> {
        let cols = usize::from(grid_cols.max(1));
        let mut footprints = Vec::new();
        for tile in tiles {
            if let Some(fp) = footprint(tile, grid_cols)? {
                footprints.push((tile.id().as_str(), fp));
            }
        }
        let rows = footprints
            .iter()
            .map(|(_, fp)| fp.last_row())
            .max()
            .unwrap_or(1);

        let mut labels: Vec<Vec<Vec<&str>>> = vec![vec![Vec::new(); cols]; usize::from(rows)];
        for (id, fp) in &footprints {
            for cell in fp.cells() {
                if cell.col == 0 || usize::from(cell.col) > cols {
                    continue;
                }
                labels[usize::from(cell.row) - 1][usize::from(cell.col) - 1].push(*id);
            }
        }

        let width = self.settings.cell_width.max(1);
        Ok(labels
            .iter()
            .map(|row| {
                let line = row
                    .iter()
                    .map(|covering| {
                        let label = match covering.as_slice() {
                            [] => EMPTY,
                            [only] => *only,
                            _ => OVERLAP,
                        };
                        fit_to_width(label, width)
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                line.trim_end().to_string()
            })
            .collect())
    }
}

/// Truncate or pad `label` to exactly `width` display columns.
fn fit_to_width(label: &str, width: u16) -> String {
    let width = usize::from(width);
    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    while out.width() < width {
        out.push(' ');
    }
    out
}
