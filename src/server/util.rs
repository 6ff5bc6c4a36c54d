//! Utility functions for request handlers

use crate::server::protocol::{error_codes, Response};
use crate::server::state::{ServerState, Session};
use serde::de::DeserializeOwned;

/// Deserialize request params, or build the INVALID_PARAMS response to return.
/// Missing params are treated as an empty object so all-optional structs parse.
pub fn parse_params<T: DeserializeOwned>(
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
    expected: &str,
) -> Result<T, Response> {
    let value = params.unwrap_or_else(|| serde_json::json!({}));
    serde_json::from_value(value).map_err(|e| {
        Response::error(
            id,
            error_codes::INVALID_PARAMS,
            format!("Invalid params: expected {} ({})", expected, e),
        )
    })
}

/// Borrow the open session, or build the NO_SESSION response to return
pub fn require_session<'a>(
    state: &'a mut ServerState,
    id: &Option<serde_json::Value>,
) -> Result<&'a mut Session, Response> {
    state.session.as_mut().ok_or_else(|| {
        Response::error(
            id.clone(),
            error_codes::NO_SESSION,
            "No session open. Call Open first.".to_string(),
        )
    })
}
