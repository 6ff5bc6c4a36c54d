//! Region-of-interest geometry engine
//!
//! Users draw polygons or circles over a canvas; each accepted shape is
//! mapped onto a fixed logical grid and kept with its covered cell indices.
//!
//! # Submodules
//! - `types` - Points, boundaries, region ids
//! - `primitives` - Point-in-polygon, segment intersection, overlap tests
//! - `grid` - Grid definition and center-sampling rasterizer
//! - `store` - Ordered region collection with hit-testing
//! - `editor` - Pointer/key driven state machine
//! - `error` - Commit rejection reasons

mod types;
mod primitives;
mod grid;
mod store;
mod editor;
mod error;

pub use types::{Boundary, Point, RegionId, ShapeKind};

pub use primitives::{
    point_in_polygon,
    segments_intersect,
    do_edges_intersect,
    polygons_overlap,
    point_in_circle,
    point_segment_distance,
    circles_overlap,
    circle_polygon_overlap,
};

pub use grid::Grid;
pub use store::{Region, RegionStore};
pub use editor::{
    Editor,
    EventSource,
    ExportReport,
    InputEvent,
    Outcome,
    RegionSummary,
    ScriptedEvents,
    Sketch,
    MIN_POLYGON_POINTS,
};
pub use error::CommitError;
