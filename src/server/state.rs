//! Server state management for the region server

use crate::config::SessionConfig;
use crate::export::ExportSink;
use crate::roi::{Editor, Grid};
use crate::scenario::Scenario;
use crate::surface::CanvasSize;

/// One participant's drawing session over one scenario image
#[derive(Debug)]
pub struct Session {
    pub scenario: Scenario,
    pub canvas: CanvasSize,
    pub editor: Editor,
}

impl Session {
    pub fn new(config: &SessionConfig, scenario: Scenario, canvas: CanvasSize) -> Self {
        let grid = Grid::new(config.grid_cols, config.grid_rows, canvas.width, canvas.height);
        Self {
            scenario,
            canvas,
            editor: Editor::new(grid, config.tool),
        }
    }
}

/// In-memory state: configuration, the open session and the export destination
pub struct ServerState {
    pub config: SessionConfig,
    pub session: Option<Session>,
    pub sink: Box<dyn ExportSink>,
}

impl ServerState {
    pub fn new(config: SessionConfig, sink: Box<dyn ExportSink>) -> Self {
        Self {
            config,
            session: None,
            sink,
        }
    }

    /// Check if a session is open
    pub fn is_session_open(&self) -> bool {
        self.session.is_some()
    }
}
