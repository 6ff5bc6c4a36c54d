//! Session lifecycle: Open, Close, SetTool

use crate::roi::ShapeKind;
use crate::scenario::Scenario;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::{ServerState, Session};
use crate::server::util::{parse_params, require_session};
use crate::surface::fit_canvas;
use serde::Deserialize;

/// Handle Open request - sizes the canvas for a scenario image and starts a fresh session
pub fn handle_open(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct OpenParams {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        scenario: Option<u8>,
        natural_width: f64,
        natural_height: f64,
        #[serde(default)]
        tool: Option<String>,
    }

    let p: OpenParams = match parse_params(
        id.clone(),
        params,
        "{natural_width, natural_height, query?, scenario?, tool?}",
    ) {
        Ok(p) => p,
        Err(e) => return e,
    };

    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(p.natural_width) || !valid(p.natural_height) {
        return Response::error(
            id,
            error_codes::INVALID_PARAMS,
            format!(
                "Invalid params: image size must be positive (got {}x{})",
                p.natural_width, p.natural_height
            ),
        );
    }

    let scenario = match (&p.query, p.scenario) {
        (Some(query), _) => Scenario::from_query(query),
        (None, Some(n)) => Scenario::from_number(n).unwrap_or_default(),
        (None, None) => Scenario::default(),
    };

    let tool = match p.tool.as_deref() {
        Some(name) => match ShapeKind::parse(name) {
            Some(tool) => tool,
            None => {
                return Response::error(id, error_codes::UNKNOWN_NAME, format!("Unknown tool: {}", name));
            }
        },
        None => state.config.tool,
    };

    let canvas = fit_canvas(p.natural_width, p.natural_height, state.config.max_canvas_width);
    let mut session = Session::new(&state.config, scenario, canvas);
    session.editor.set_tool(tool);

    tracing::info!(
        "Opened {} ({}) on a {:.0}x{:.0} canvas, grid {}x{}",
        scenario.title(),
        scenario.image_path(),
        canvas.width,
        canvas.height,
        state.config.grid_cols,
        state.config.grid_rows
    );

    let result = serde_json::json!({
        "status": "ok",
        "scenario": scenario,
        "title": scenario.title(),
        "image_path": scenario.image_path(),
        "diagram_path": scenario.diagram_path(),
        "diagram_alt": scenario.diagram_alt(),
        "canvas": canvas,
        "grid": session.editor.grid(),
        "tool": tool,
    });
    state.session = Some(session);
    Response::success(id, result)
}

/// Handle SetTool request - switches the shape used by the next draw
pub fn handle_set_tool(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct Params {
        tool: String,
    }

    let p: Params = match parse_params(id.clone(), params, "{tool: \"polygon\" | \"circle\"}") {
        Ok(p) => p,
        Err(e) => return e,
    };

    let Some(tool) = ShapeKind::parse(&p.tool) else {
        return Response::error(id, error_codes::UNKNOWN_NAME, format!("Unknown tool: {}", p.tool));
    };

    let session = match require_session(state, &id) {
        Ok(s) => s,
        Err(e) => return e,
    };
    session.editor.set_tool(tool);
    tracing::debug!("Tool set to {:?}", tool);

    Response::success(id, serde_json::json!({ "status": "ok", "tool": tool }))
}

/// Handle Close request - drops the session and all of its regions
pub fn handle_close(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let dropped = state
        .session
        .take()
        .map_or(0, |s| s.editor.regions().len());
    tracing::info!("Closed session ({} region(s) discarded)", dropped);

    Response::success(id, serde_json::json!({ "status": "ok", "discarded_regions": dropped }))
}
