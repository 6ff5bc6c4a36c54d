//! Session configuration
//!
//! Fixed for the lifetime of the process; the binary fills it from CLI
//! arguments and environment variables.

use crate::roi::ShapeKind;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_COLS: u32 = 240;
pub const DEFAULT_GRID_ROWS: u32 = 80;
pub const DEFAULT_MAX_CANVAS_WIDTH: f64 = 1000.0;

/// What `Finish` does when no region exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyExportPolicy {
    /// Send the payload with an empty list
    #[default]
    Emit,
    /// Only show the empty-state message
    Suppress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub max_canvas_width: f64,
    pub tool: ShapeKind,
    pub empty_export: EmptyExportPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_cols: DEFAULT_GRID_COLS,
            grid_rows: DEFAULT_GRID_ROWS,
            max_canvas_width: DEFAULT_MAX_CANVAS_WIDTH,
            tool: ShapeKind::Polygon,
            empty_export: EmptyExportPolicy::Emit,
        }
    }
}

impl SessionConfig {
    /// Reject settings the rasterizer cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.grid_cols > 0 && self.grid_rows > 0,
            "grid must have at least one column and one row (got {}x{})",
            self.grid_cols,
            self.grid_rows
        );
        anyhow::ensure!(
            self.grid_cols.checked_mul(self.grid_rows).is_some(),
            "grid {}x{} has too many cells",
            self.grid_cols,
            self.grid_rows
        );
        anyhow::ensure!(
            self.max_canvas_width.is_finite() && self.max_canvas_width > 0.0,
            "max canvas width must be positive (got {})",
            self.max_canvas_width
        );
        Ok(())
    }
}
