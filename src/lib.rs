//! Region-of-interest grid annotation
//!
//! Participants outline areas of a design image with polygons or circles.
//! Each accepted outline is rasterized onto a fixed logical grid and the
//! covered cell indices are exported to the host survey page.

pub mod config;
pub mod export;
pub mod roi;
pub mod scenario;
pub mod server;
pub mod surface;

pub use config::{EmptyExportPolicy, SessionConfig};
pub use export::{ExportPayload, ExportSink, JsonLineSink};
pub use roi::{Boundary, Editor, Grid, InputEvent, Outcome, Point, RegionId, ShapeKind};
pub use scenario::Scenario;
