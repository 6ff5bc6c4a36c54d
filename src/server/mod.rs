//! Region server - line-delimited JSON-RPC front end for the ROI editor
//!
//! The host page forwards pointer and key events; each request produces
//! exactly one response line. Export payloads are delivered separately
//! through the session's [`ExportSink`](crate::export::ExportSink).
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response types
//! - `state` - Server state and the open session
//! - `util` - Param parsing and session lookup helpers
//! - `handlers` - Request handlers organized by functionality

pub mod handlers;
pub mod protocol;
pub mod state;
pub mod util;

pub use protocol::{error_codes, ErrorResponse, Request, Response};
pub use state::{ServerState, Session};

use handlers::*;

/// Route one request to its handler
pub fn handle_request(state: &mut ServerState, request: Request) -> Response {
    tracing::debug!("Request: {}", request.method);
    match request.method.as_str() {
        "Open" => handle_open(state, request.id, request.params),
        "PointerDown" => handle_pointer_down(state, request.id, request.params),
        "PointerMove" => handle_pointer_move(state, request.id, request.params),
        "PointerUp" => handle_pointer_up(state, request.id),
        "KeyDown" => handle_key_down(state, request.id, request.params),
        "SetTool" => handle_set_tool(state, request.id, request.params),
        "Finish" => handle_finish(state, request.id),
        "GetRegions" => handle_get_regions(state, request.id),
        "GetPreview" => handle_get_preview(state, request.id),
        "Close" => handle_close(state, request.id),
        _ => Response::error(
            request.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

/// Process one input line and return the response line, if any.
/// Blank lines produce nothing.
pub fn handle_line(state: &mut ServerState, line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<serde_json::Value>(line) {
        Err(e) => {
            tracing::warn!("Failed to parse request: {}", e);
            Response::error(None, error_codes::PARSE_ERROR, format!("Parse error: {}", e))
        }
        Ok(value) => {
            let id = value.get("id").cloned();
            match serde_json::from_value::<Request>(value) {
                Ok(request) => handle_request(state, request),
                Err(e) => Response::error(id, error_codes::INVALID_REQUEST, format!("Invalid request: {}", e)),
            }
        }
    };

    if response.is_error() {
        if let Some(err) = &response.error {
            tracing::debug!("Error response {}: {}", err.code, err.message);
        }
    }

    match serde_json::to_string(&response) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            Some(format!(
                "{{\"id\":null,\"error\":{{\"code\":{},\"message\":\"Serialization failed\"}}}}",
                error_codes::INTERNAL_ERROR
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::export::JsonLineSink;

    fn state() -> ServerState {
        ServerState::new(SessionConfig::default(), Box::new(JsonLineSink::new(std::io::sink())))
    }

    fn reply(state: &mut ServerState, line: &str) -> serde_json::Value {
        let text = handle_line(state, line).expect("response line");
        serde_json::from_str(&text).expect("response is json")
    }

    #[test]
    fn test_blank_line_is_skipped() {
        let mut s = state();
        assert!(handle_line(&mut s, "   ").is_none());
    }

    #[test]
    fn test_parse_and_request_errors() {
        let mut s = state();
        let v = reply(&mut s, "{not json");
        assert_eq!(v["error"]["code"], error_codes::PARSE_ERROR);

        let v = reply(&mut s, r#"{"id":4,"params":{}}"#);
        assert_eq!(v["error"]["code"], error_codes::INVALID_REQUEST);
        assert_eq!(v["id"], 4);
    }

    #[test]
    fn test_unknown_method() {
        let mut s = state();
        let v = reply(&mut s, r#"{"id":1,"method":"Rotate"}"#);
        assert_eq!(v["error"]["code"], error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_requires_open_session() {
        let mut s = state();
        for method in ["PointerUp", "Finish", "GetRegions", "GetPreview"] {
            let v = reply(&mut s, &format!(r#"{{"id":1,"method":"{}"}}"#, method));
            assert_eq!(v["error"]["code"], error_codes::NO_SESSION, "{}", method);
        }
    }
}
