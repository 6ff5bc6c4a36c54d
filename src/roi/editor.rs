//! Interaction state machine
//!
//! Turns pointer and key events into validated regions. The editor owns the
//! region store, the selection and the in-progress sketch, so any number of
//! independent sessions can run side by side and be driven headlessly from
//! an [`EventSource`].
//!
//! States: `Idle` (optionally with a selected region) and `Drawing`.
//! A pointer-down while already drawing is ignored.

use super::error::CommitError;
use super::grid::Grid;
use super::store::{Region, RegionStore};
use super::types::{Boundary, Point, RegionId, ShapeKind};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Instant;

/// Minimum distinct vertices, before closing, for a polygon to be kept
pub const MIN_POLYGON_POINTS: usize = 3;

/// Input understood by the editor. Pointer positions are canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    /// Backspace or Delete
    DeleteKey,
    /// Collaborator UI asked for the results
    Finish,
}

impl InputEvent {
    /// Map a DOM-style key name onto an editor event
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Backspace" | "Delete" => Some(InputEvent::DeleteKey),
            _ => None,
        }
    }
}

/// Anything that can feed events to an [`Editor`]
pub trait EventSource {
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Pre-recorded event sequence
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    queue: VecDeque<InputEvent>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }
}

/// Shape under construction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Sketch {
    Polygon { points: Vec<Point> },
    Circle { center: Point, radius: f64 },
}

impl Sketch {
    fn start(tool: ShapeKind, at: Point) -> Self {
        match tool {
            ShapeKind::Polygon => Sketch::Polygon { points: vec![at] },
            ShapeKind::Circle => Sketch::Circle { center: at, radius: 0.0 },
        }
    }

    fn extend(&mut self, to: Point) {
        match self {
            Sketch::Polygon { points } => {
                // Pointer moves often repeat the last sample
                if points.last() != Some(&to) {
                    points.push(to);
                }
            }
            Sketch::Circle { center, radius } => *radius = center.distance_to(to),
        }
    }

    /// Validate the minimum-size rule and produce the final boundary
    fn finish(self) -> Result<Boundary, CommitError> {
        match self {
            Sketch::Polygon { points } => {
                let distinct = distinct_vertices(&points, MIN_POLYGON_POINTS);
                if distinct < MIN_POLYGON_POINTS {
                    return Err(CommitError::Degenerate { points: distinct });
                }
                Ok(Boundary::closed_polygon(points))
            }
            Sketch::Circle { center, radius } => {
                if radius <= 0.0 {
                    return Err(CommitError::Degenerate { points: 1 });
                }
                Ok(Boundary::circle(center, radius))
            }
        }
    }
}

/// Count distinct vertices, stopping once `limit` is reached
fn distinct_vertices(points: &[Point], limit: usize) -> usize {
    let mut seen: Vec<Point> = Vec::with_capacity(limit);
    for &pt in points {
        if !seen.contains(&pt) {
            seen.push(pt);
            if seen.len() == limit {
                break;
            }
        }
    }
    seen.len()
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Drawing(Sketch),
}

/// Per-region line of the finish report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub id: RegionId,
    /// 1-based, creation order
    pub number: usize,
    pub cell_count: usize,
}

/// Snapshot handed to the export adapter on finish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub regions: Vec<RegionSummary>,
    /// Cell lists in creation order
    pub cells: Vec<Vec<u32>>,
}

impl ExportReport {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// What a single event did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The event does not apply in the current state
    Ignored,
    DrawStarted,
    /// A point was appended (polygon) or the radius changed (circle)
    SketchUpdated,
    Selected(RegionId),
    Committed(RegionId),
    /// Too small to keep; no notice to the user
    Discarded,
    /// Overlap conflict; the notice must be shown
    Rejected(CommitError),
    Deleted(RegionId),
    Finished(ExportReport),
}

#[derive(Debug)]
pub struct Editor {
    grid: Grid,
    tool: ShapeKind,
    store: RegionStore,
    phase: Phase,
    selected: Option<RegionId>,
}

impl Editor {
    pub fn new(grid: Grid, tool: ShapeKind) -> Self {
        Self {
            grid,
            tool,
            store: RegionStore::new(),
            phase: Phase::Idle,
            selected: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tool(&self) -> ShapeKind {
        self.tool
    }

    /// Takes effect on the next draw
    pub fn set_tool(&mut self, tool: ShapeKind) {
        self.tool = tool;
    }

    pub fn regions(&self) -> &RegionStore {
        &self.store
    }

    pub fn selected(&self) -> Option<RegionId> {
        self.selected
    }

    pub fn selected_region(&self) -> Option<&Region> {
        self.selected.and_then(|id| self.store.get(id))
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, Phase::Drawing(_))
    }

    /// Shape being drawn, for preview rendering
    pub fn preview(&self) -> Option<&Sketch> {
        match &self.phase {
            Phase::Drawing(sketch) => Some(sketch),
            Phase::Idle => None,
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> Outcome {
        match event {
            InputEvent::PointerDown(at) => self.pointer_down(at),
            InputEvent::PointerMove(at) => self.pointer_move(at),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::DeleteKey => self.delete_selected(),
            InputEvent::Finish => Outcome::Finished(self.export()),
        }
    }

    /// Drain `source`, returning one outcome per event
    pub fn run<S: EventSource>(&mut self, source: &mut S) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = source.next_event() {
            outcomes.push(self.handle(event));
        }
        outcomes
    }

    fn pointer_down(&mut self, at: Point) -> Outcome {
        if self.is_drawing() {
            return Outcome::Ignored;
        }

        if let Some(hit) = self.store.find_topmost_containing(at) {
            self.selected = Some(hit);
            tracing::debug!("Selected region {}", hit);
            return Outcome::Selected(hit);
        }

        self.selected = None;
        self.phase = Phase::Drawing(Sketch::start(self.tool, at));
        Outcome::DrawStarted
    }

    fn pointer_move(&mut self, at: Point) -> Outcome {
        match &mut self.phase {
            Phase::Drawing(sketch) => {
                sketch.extend(at);
                Outcome::SketchUpdated
            }
            Phase::Idle => Outcome::Ignored,
        }
    }

    fn pointer_up(&mut self) -> Outcome {
        let Phase::Drawing(sketch) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return Outcome::Ignored;
        };

        match self.commit(sketch) {
            Ok(id) => Outcome::Committed(id),
            Err(err @ CommitError::Degenerate { .. }) => {
                tracing::debug!("Dropped draw: {}", err);
                Outcome::Discarded
            }
            Err(err) => {
                tracing::info!("Rejected draw: {}", err);
                Outcome::Rejected(err)
            }
        }
    }

    /// Validate the sketch against every existing region, then rasterize and store it
    fn commit(&mut self, sketch: Sketch) -> Result<RegionId, CommitError> {
        let boundary = sketch.finish()?;

        if let Some(existing) = self.store.find_overlapping(&boundary) {
            return Err(CommitError::Overlap { existing });
        }

        let kind = boundary.kind();
        let start = Instant::now();
        let id = self.store.add(boundary, &self.grid);
        let cell_count = self.store.get(id).map_or(0, |r| r.cells.len());
        tracing::info!(
            "Committed {:?} region {} covering {} cells (rasterized in {:.2?})",
            kind,
            id,
            cell_count,
            start.elapsed()
        );
        Ok(id)
    }

    fn delete_selected(&mut self) -> Outcome {
        let Some(id) = self.selected.take() else {
            return Outcome::Ignored;
        };
        match self.store.remove(id) {
            Some(_) => {
                tracing::info!("Deleted region {}", id);
                Outcome::Deleted(id)
            }
            None => Outcome::Ignored,
        }
    }

    /// Read-only snapshot of every region's coverage; may be called any number of times
    pub fn export(&self) -> ExportReport {
        let regions = self
            .store
            .iter()
            .enumerate()
            .map(|(i, r)| RegionSummary {
                id: r.id,
                number: i + 1,
                cell_count: r.cells.len(),
            })
            .collect();
        ExportReport {
            regions,
            cells: self.store.cell_sets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn editor() -> Editor {
        Editor::new(Grid::new(10, 10, 100.0, 100.0), ShapeKind::Polygon)
    }

    fn draw(editor: &mut Editor, points: &[Point]) -> Outcome {
        let mut events = ScriptedEvents::default();
        if let Some((first, rest)) = points.split_first() {
            events.push(InputEvent::PointerDown(*first));
            for pt in rest {
                events.push(InputEvent::PointerMove(*pt));
            }
        }
        events.push(InputEvent::PointerUp);
        editor.run(&mut events).pop().unwrap_or(Outcome::Ignored)
    }

    #[test]
    fn test_draw_commit() {
        let mut ed = editor();
        let outcome = draw(&mut ed, &[p(0.0, 0.0), p(30.0, 0.0), p(30.0, 30.0), p(0.0, 30.0)]);
        assert!(matches!(outcome, Outcome::Committed(_)));
        assert_eq!(ed.regions().len(), 1);
        assert!(!ed.is_drawing());
        let region = ed.regions().iter().next().map(|r| r.cells.clone());
        assert_eq!(region, Some(vec![0, 1, 2, 10, 11, 12, 20, 21, 22]));
    }

    #[test]
    fn test_committed_ring_is_closed() {
        let mut ed = editor();
        draw(&mut ed, &[p(0.0, 0.0), p(30.0, 0.0), p(0.0, 30.0)]);
        let Some(Boundary::Polygon { ring }) = ed.regions().iter().next().map(|r| r.boundary.clone()) else {
            panic!("expected polygon");
        };
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_short_drags_are_discarded() {
        let mut ed = editor();
        assert_eq!(draw(&mut ed, &[p(5.0, 5.0)]), Outcome::Discarded);
        assert_eq!(draw(&mut ed, &[p(5.0, 5.0), p(50.0, 50.0)]), Outcome::Discarded);
        assert!(ed.regions().is_empty());
    }

    #[test]
    fn test_repeated_samples_are_not_vertices() {
        let mut ed = editor();
        assert_eq!(draw(&mut ed, &[p(55.0, 55.0), p(55.0, 55.0), p(55.0, 55.0)]), Outcome::Discarded);
        // Back and forth between two spots is still two vertices
        assert_eq!(
            draw(&mut ed, &[p(10.0, 10.0), p(40.0, 10.0), p(10.0, 10.0), p(40.0, 10.0)]),
            Outcome::Discarded
        );
        assert!(ed.regions().is_empty());
        assert_eq!(ed.export().cells, Vec::<Vec<u32>>::new());

        // Nothing left behind, so the spot starts a fresh draw
        assert_eq!(ed.handle(InputEvent::PointerDown(p(55.0, 55.0))), Outcome::DrawStarted);
        ed.handle(InputEvent::PointerMove(p(55.0, 55.0)));
        let Some(Sketch::Polygon { points }) = ed.preview().cloned() else {
            panic!("expected polygon sketch");
        };
        assert_eq!(points, vec![p(55.0, 55.0)]);
    }

    #[test]
    fn test_distinct_vertices() {
        assert_eq!(distinct_vertices(&[], 3), 0);
        assert_eq!(distinct_vertices(&[p(1.0, 1.0), p(1.0, 1.0)], 3), 1);
        assert_eq!(distinct_vertices(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0)], 3), 3);
        assert_eq!(distinct_vertices(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)], 3), 3);
    }

    #[test]
    fn test_overlap_rejected() {
        let mut ed = editor();
        draw(&mut ed, &[p(0.0, 0.0), p(40.0, 0.0), p(40.0, 40.0), p(0.0, 40.0)]);
        let outcome = draw(&mut ed, &[p(50.0, 20.0), p(20.0, 20.0), p(20.0, 60.0)]);
        let Outcome::Rejected(err) = outcome else {
            panic!("expected rejection, got {:?}", outcome);
        };
        assert!(err.is_user_visible());
        assert_eq!(ed.regions().len(), 1);
    }

    #[test]
    fn test_pointer_down_while_drawing_is_ignored() {
        let mut ed = editor();
        assert_eq!(ed.handle(InputEvent::PointerDown(p(10.0, 10.0))), Outcome::DrawStarted);
        assert_eq!(ed.handle(InputEvent::PointerDown(p(90.0, 90.0))), Outcome::Ignored);
        ed.handle(InputEvent::PointerMove(p(20.0, 10.0)));
        ed.handle(InputEvent::PointerMove(p(20.0, 20.0)));
        let Some(Sketch::Polygon { points }) = ed.preview().cloned() else {
            panic!("expected polygon sketch");
        };
        assert_eq!(points, vec![p(10.0, 10.0), p(20.0, 10.0), p(20.0, 20.0)]);
    }

    #[test]
    fn test_idle_events_are_ignored() {
        let mut ed = editor();
        assert_eq!(ed.handle(InputEvent::PointerMove(p(1.0, 1.0))), Outcome::Ignored);
        assert_eq!(ed.handle(InputEvent::PointerUp), Outcome::Ignored);
        assert_eq!(ed.handle(InputEvent::DeleteKey), Outcome::Ignored);
    }

    #[test]
    fn test_select_and_delete() {
        let mut ed = editor();
        draw(&mut ed, &[p(0.0, 0.0), p(20.0, 0.0), p(20.0, 20.0), p(0.0, 20.0)]);
        draw(&mut ed, &[p(50.0, 50.0), p(70.0, 50.0), p(70.0, 70.0), p(50.0, 70.0)]);

        let Outcome::Selected(id) = ed.handle(InputEvent::PointerDown(p(60.0, 60.0))) else {
            panic!("expected selection");
        };
        assert!(!ed.is_drawing());
        assert_eq!(ed.selected(), Some(id));
        assert_eq!(ed.selected_region().map(|r| r.cells.clone()), Some(vec![55, 56, 65, 66]));
        // Releasing after a selection click does nothing
        assert_eq!(ed.handle(InputEvent::PointerUp), Outcome::Ignored);

        assert_eq!(ed.handle(InputEvent::DeleteKey), Outcome::Deleted(id));
        assert_eq!(ed.selected(), None);
        assert!(ed.selected_region().is_none());
        assert_eq!(ed.regions().len(), 1);
        assert_eq!(ed.handle(InputEvent::DeleteKey), Outcome::Ignored);
    }

    #[test]
    fn test_new_draw_clears_selection() {
        let mut ed = editor();
        draw(&mut ed, &[p(0.0, 0.0), p(20.0, 0.0), p(20.0, 20.0), p(0.0, 20.0)]);
        ed.handle(InputEvent::PointerDown(p(10.0, 10.0)));
        assert!(ed.selected().is_some());
        ed.handle(InputEvent::PointerUp);
        assert_eq!(ed.handle(InputEvent::PointerDown(p(80.0, 80.0))), Outcome::DrawStarted);
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn test_circle_tool() {
        let mut ed = Editor::new(Grid::new(10, 10, 100.0, 100.0), ShapeKind::Circle);
        assert_eq!(draw(&mut ed, &[p(50.0, 50.0)]), Outcome::Discarded);

        let outcome = draw(&mut ed, &[p(50.0, 50.0), p(55.0, 50.0), p(58.0, 50.0)]);
        let Outcome::Committed(id) = outcome else {
            panic!("expected commit, got {:?}", outcome);
        };
        let region = ed.regions().get(id).cloned();
        assert_eq!(region.as_ref().map(|r| r.boundary.clone()), Some(Boundary::circle(p(50.0, 50.0), 8.0)));
        assert_eq!(region.map(|r| r.cells), Some(vec![44, 45, 54, 55]));

        // Clicking inside the circle selects it
        assert_eq!(ed.handle(InputEvent::PointerDown(p(52.0, 52.0))), Outcome::Selected(id));
    }

    #[test]
    fn test_mixed_shapes_overlap() {
        let mut ed = editor();
        draw(&mut ed, &[p(0.0, 0.0), p(40.0, 0.0), p(40.0, 40.0), p(0.0, 40.0)]);
        ed.set_tool(ShapeKind::Circle);
        let outcome = draw(&mut ed, &[p(50.0, 20.0), p(60.0, 20.0)]);
        assert!(matches!(outcome, Outcome::Rejected(CommitError::Overlap { .. })));
        let outcome = draw(&mut ed, &[p(70.0, 70.0), p(75.0, 70.0)]);
        assert!(matches!(outcome, Outcome::Committed(_)));
    }

    #[test]
    fn test_finish_is_read_only() {
        let mut ed = editor();
        draw(&mut ed, &[p(0.0, 0.0), p(20.0, 0.0), p(20.0, 20.0), p(0.0, 20.0)]);
        let first = ed.handle(InputEvent::Finish);
        let second = ed.handle(InputEvent::Finish);
        assert_eq!(first, second);
        let Outcome::Finished(report) = first else {
            panic!("expected report");
        };
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].number, 1);
        assert_eq!(report.regions[0].cell_count, 4);
        assert_eq!(report.cells, vec![vec![0, 1, 10, 11]]);
        assert_eq!(ed.regions().len(), 1);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(InputEvent::from_key("Backspace"), Some(InputEvent::DeleteKey));
        assert_eq!(InputEvent::from_key("Delete"), Some(InputEvent::DeleteKey));
        assert_eq!(InputEvent::from_key("Enter"), None);
    }
}
