//! Read-only queries: GetRegions, GetPreview

use crate::roi::{Boundary, RegionId};
use crate::server::protocol::Response;
use crate::server::state::ServerState;
use crate::server::util::require_session;
use serde::Serialize;

#[derive(Serialize)]
struct RegionInfo<'a> {
    id: RegionId,
    number: usize,
    selected: bool,
    boundary: &'a Boundary,
    cell_count: usize,
    cells: &'a [u32],
}

/// Handle GetRegions request - committed regions in creation (z) order
pub fn handle_get_regions(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let session = match require_session(state, &id) {
        Ok(s) => s,
        Err(e) => return e,
    };
    let editor = &session.editor;

    let regions: Vec<RegionInfo> = editor
        .regions()
        .iter()
        .enumerate()
        .map(|(i, r)| RegionInfo {
            id: r.id,
            number: i + 1,
            selected: editor.selected() == Some(r.id),
            boundary: &r.boundary,
            cell_count: r.cells.len(),
            cells: &r.cells,
        })
        .collect();

    Response::from_serializable(id, &regions)
}

/// Handle GetPreview request - the shape currently being drawn, if any
pub fn handle_get_preview(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let session = match require_session(state, &id) {
        Ok(s) => s,
        Err(e) => return e,
    };

    Response::success(
        id,
        serde_json::json!({
            "drawing": session.editor.is_drawing(),
            "tool": session.editor.tool(),
            "preview": session.editor.preview(),
        }),
    )
}
