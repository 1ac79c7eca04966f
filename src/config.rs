use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::board::audit::{GestureAudit, NullGestureAudit};
use crate::error::{PlacementError, Result};
use crate::logging::Logger;
use crate::metrics::PlacementMetrics;

/// Column count of the builder's desktop canvas.
pub const CANVAS_COLUMNS: u16 = 3;
/// Default number of rows the placer scans before giving up.
pub const DEFAULT_PROBE_ROWS: u16 = 20;

/// How far down the auto placer scans for a free position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowProbe {
    /// Scan at most this many anchor rows.
    Rows(u16),
    /// Scan until one row past the lowest occupied cell, where a fit always exists.
    Unbounded,
}

impl Default for RowProbe {
    fn default() -> Self {
        RowProbe::Rows(DEFAULT_PROBE_ROWS)
    }
}

/// Grid dimensions supplied by the rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub columns: u16,
    #[serde(default)]
    pub probe: RowProbe,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::canvas()
    }
}

impl GridConfig {
    pub fn new(columns: u16, probe: RowProbe) -> Result<Self> {
        let config = Self { columns, probe };
        config.validate()?;
        Ok(config)
    }

    /// Full desktop canvas.
    pub const fn canvas() -> Self {
        Self {
            columns: CANVAS_COLUMNS,
            probe: RowProbe::Rows(DEFAULT_PROBE_ROWS),
        }
    }

    /// Single-column list used by the mobile preview.
    pub const fn compact() -> Self {
        Self {
            columns: 1,
            probe: RowProbe::Rows(DEFAULT_PROBE_ROWS),
        }
    }

    pub fn with_probe(mut self, probe: RowProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(PlacementError::InvalidConfig(
                "grid needs at least one column".to_string(),
            ));
        }
        if self.probe == RowProbe::Rows(0) {
            return Err(PlacementError::InvalidConfig(
                "row probe must scan at least one row".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON grid description.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}

/// Knobs for a [`BoardController`](crate::board::BoardController).
#[derive(Clone)]
pub struct EngineConfig {
    pub grid: GridConfig,
    /// Optional structured logger used by the controller.
    pub logger: Option<Logger>,
    /// Shared counters, when enabled.
    pub metrics: Option<Arc<Mutex<PlacementMetrics>>>,
    /// Receives one record per gesture stage.
    pub audit: Arc<dyn GestureAudit>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::canvas(),
            logger: None,
            metrics: None,
            audit: Arc::new(NullGestureAudit),
        }
    }
}

impl EngineConfig {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit<A>(mut self, audit: A) -> Self
    where
        A: GestureAudit + 'static,
    {
        self.audit = Arc::new(audit);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(PlacementMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<PlacementMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}
