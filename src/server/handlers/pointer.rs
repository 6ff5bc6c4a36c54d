//! Pointer and key input: PointerDown, PointerMove, PointerUp, KeyDown

use crate::roi::{CommitError, Editor, InputEvent, Outcome, Point};
use crate::server::protocol::Response;
use crate::server::state::{ServerState, Session};
use crate::server::util::{parse_params, require_session};
use crate::surface::{to_canvas, DisplayRect};
use serde::Deserialize;

#[derive(Deserialize)]
struct PointerParams {
    client_x: f64,
    client_y: f64,
    /// Current on-page rectangle of the canvas; identity mapping when absent
    #[serde(default)]
    rect: Option<DisplayRect>,
}

/// Describe what an input event did, for the client to react to
pub fn outcome_to_json(outcome: &Outcome, editor: &Editor) -> serde_json::Value {
    let number = |id| editor.regions().position(id).map(|pos| pos + 1);
    match outcome {
        Outcome::Ignored => serde_json::json!({ "status": "ignored" }),
        Outcome::DrawStarted | Outcome::SketchUpdated => serde_json::json!({
            "status": "drawing",
            "preview": editor.preview(),
        }),
        Outcome::Selected(region) => serde_json::json!({
            "status": "selected",
            "region_id": region,
            "number": number(*region),
        }),
        Outcome::Committed(region) => serde_json::json!({
            "status": "committed",
            "region_id": region,
            "number": number(*region),
            "cell_count": editor.regions().get(*region).map_or(0, |r| r.cells.len()),
        }),
        Outcome::Discarded => serde_json::json!({ "status": "discarded" }),
        Outcome::Rejected(err) => {
            let conflict = match err {
                CommitError::Overlap { existing } => Some(*existing),
                CommitError::Degenerate { .. } => None,
            };
            serde_json::json!({
                "status": "rejected",
                "message": err.to_string(),
                "conflict": conflict,
            })
        }
        Outcome::Deleted(region) => serde_json::json!({ "status": "deleted", "region_id": region }),
        Outcome::Finished(report) => serde_json::json!({ "status": "finished", "regions": report.regions }),
    }
}

fn pointer_event(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    make: fn(Point) -> InputEvent,
) -> Response {
    let p: PointerParams = match parse_params(id.clone(), params, "{client_x, client_y, rect?}") {
        Ok(p) => p,
        Err(e) => return e,
    };
    let session = match require_session(state, &id) {
        Ok(s) => s,
        Err(e) => return e,
    };

    // Re-derived on every event so a resized page never uses stale scale factors
    let rect = p.rect.unwrap_or(DisplayRect {
        left: 0.0,
        top: 0.0,
        width: session.canvas.width,
        height: session.canvas.height,
    });
    let at = to_canvas(p.client_x, p.client_y, &rect, session.canvas);
    apply(session, id, make(at))
}

fn apply(session: &mut Session, id: Option<serde_json::Value>, event: InputEvent) -> Response {
    let outcome = session.editor.handle(event);
    Response::success(id, outcome_to_json(&outcome, &session.editor))
}

/// Handle PointerDown request - selects a region or starts a new draw
pub fn handle_pointer_down(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    pointer_event(state, id, params, InputEvent::PointerDown)
}

/// Handle PointerMove request - extends the draw in progress
pub fn handle_pointer_move(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    pointer_event(state, id, params, InputEvent::PointerMove)
}

/// Handle PointerUp request - validates and commits the draw in progress
pub fn handle_pointer_up(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    match require_session(state, &id) {
        Ok(session) => apply(session, id, InputEvent::PointerUp),
        Err(e) => e,
    }
}

/// Handle KeyDown request - Backspace/Delete removes the selected region, other keys are ignored
pub fn handle_key_down(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct Params {
        key: String,
    }

    let p: Params = match parse_params(id.clone(), params, "{key}") {
        Ok(p) => p,
        Err(e) => return e,
    };
    let session = match require_session(state, &id) {
        Ok(s) => s,
        Err(e) => return e,
    };

    match InputEvent::from_key(&p.key) {
        Some(event) => apply(session, id, event),
        None => Response::success(id, serde_json::json!({ "status": "ignored" })),
    }
}
