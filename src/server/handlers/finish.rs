//! Finish handler: summarize regions and post them to the host page

use crate::export::{build_payload, post, summary_text};
use crate::roi::{InputEvent, Outcome};
use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;
use serde::Serialize;

#[derive(Serialize)]
struct FinishResult {
    summary: String,
    region_count: usize,
    regions: Vec<crate::roi::RegionSummary>,
    /// Whether a payload was handed to the sink
    exported: bool,
}

/// Handle Finish request - idempotent; may be sent any number of times
pub fn handle_finish(state: &mut ServerState, id: Option<serde_json::Value>) -> Response {
    let policy = state.config.empty_export;
    let Some(session) = state.session.as_mut() else {
        return Response::error(id, error_codes::NO_SESSION, "No session open. Call Open first.".to_string());
    };

    let Outcome::Finished(report) = session.editor.handle(InputEvent::Finish) else {
        return Response::error(id, error_codes::INTERNAL_ERROR, "Finish produced no report".to_string());
    };

    let payload = match build_payload(session.scenario, &report, policy) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(id, error_codes::INTERNAL_ERROR, format!("Failed to build export: {}", e));
        }
    };

    let exported = match &payload {
        Some(payload) => post(state.sink.as_mut(), payload),
        None => {
            tracing::info!("No regions to export; payload suppressed");
            false
        }
    };

    Response::from_serializable(
        id,
        &FinishResult {
            summary: summary_text(&report),
            region_count: report.regions.len(),
            regions: report.regions,
            exported,
        },
    )
}
