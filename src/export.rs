//! Export adapter
//!
//! Turns the editor's finish report into the participant-facing summary and
//! the payload posted to the host survey page. Delivery is fire-and-forget:
//! a failing sink is logged and otherwise ignored.

use crate::config::EmptyExportPolicy;
use crate::roi::ExportReport;
use crate::scenario::Scenario;
use serde::Serialize;
use std::io::Write;

/// Type tag the host page listens for
pub const PAYLOAD_TYPE: &str = "saveToQualtrics";
/// Shown instead of the per-region lines when nothing was drawn
pub const EMPTY_MESSAGE: &str = "No Areas of Interest created yet.";

/// Message body sent to the host page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub scenario: Scenario,
    /// JSON text of the per-region cell lists, e.g. `[[1,2],[7]]`
    pub data: String,
}

impl ExportPayload {
    pub fn new(scenario: Scenario, report: &ExportReport) -> serde_json::Result<Self> {
        Ok(Self {
            kind: PAYLOAD_TYPE.to_string(),
            scenario,
            data: serde_json::to_string(&report.cells)?,
        })
    }
}

/// One line per region, or the empty-state message
pub fn summary_text(report: &ExportReport) -> String {
    if report.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    report
        .regions
        .iter()
        .map(|r| format!("Region of Interest {} has {} elements\n", r.number, r.cell_count))
        .collect()
}

/// Payload to deliver for this report, if the policy allows one
pub fn build_payload(
    scenario: Scenario,
    report: &ExportReport,
    policy: EmptyExportPolicy,
) -> serde_json::Result<Option<ExportPayload>> {
    if report.is_empty() && policy == EmptyExportPolicy::Suppress {
        return Ok(None);
    }
    ExportPayload::new(scenario, report).map(Some)
}

/// Destination for export payloads
pub trait ExportSink {
    fn deliver(&mut self, payload: &ExportPayload) -> anyhow::Result<()>;
}

/// Writes each payload as a JSON-RPC notification line
pub struct JsonLineSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ExportSink for JsonLineSink<W> {
    fn deliver(&mut self, payload: &ExportPayload) -> anyhow::Result<()> {
        let notification = serde_json::json!({
            "id": null,
            "method": "postMessage",
            "result": payload,
        });
        writeln!(self.writer, "{}", notification)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Deliver without letting a sink failure reach the user
pub fn post(sink: &mut dyn ExportSink, payload: &ExportPayload) -> bool {
    match sink.deliver(payload) {
        Ok(()) => {
            tracing::info!("Posted export for scenario {}", payload.scenario.number());
            true
        }
        Err(e) => {
            tracing::warn!("Export delivery failed: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roi::{RegionId, RegionSummary};

    fn report(cells: Vec<Vec<u32>>) -> ExportReport {
        ExportReport {
            regions: cells
                .iter()
                .enumerate()
                .map(|(i, c)| RegionSummary {
                    id: RegionId(i as u64),
                    number: i + 1,
                    cell_count: c.len(),
                })
                .collect(),
            cells,
        }
    }

    #[test]
    fn test_summary_text() {
        let r = report(vec![vec![1, 2, 3], vec![40]]);
        assert_eq!(
            summary_text(&r),
            "Region of Interest 1 has 3 elements\nRegion of Interest 2 has 1 elements\n"
        );
        assert_eq!(summary_text(&report(vec![])), EMPTY_MESSAGE);
    }

    #[test]
    fn test_payload_shape() {
        let r = report(vec![vec![1, 2], vec![7]]);
        let payload = build_payload(Scenario::parse(Some("4")), &r, EmptyExportPolicy::Emit)
            .expect("serialize")
            .expect("payload");
        let value = serde_json::to_value(&payload).expect("to_value");
        assert_eq!(
            value,
            serde_json::json!({ "type": "saveToQualtrics", "scenario": 4, "data": "[[1,2],[7]]" })
        );
    }

    #[test]
    fn test_empty_policy() {
        let empty = report(vec![]);
        let emitted = build_payload(Scenario::default(), &empty, EmptyExportPolicy::Emit);
        assert_eq!(emitted.ok().flatten().map(|p| p.data), Some("[]".to_string()));
        let suppressed = build_payload(Scenario::default(), &empty, EmptyExportPolicy::Suppress);
        assert_eq!(suppressed.ok().flatten(), None);

        // Suppress only applies to the empty state
        let one = report(vec![vec![5]]);
        let sent = build_payload(Scenario::default(), &one, EmptyExportPolicy::Suppress);
        assert!(sent.ok().flatten().is_some());
    }

    #[test]
    fn test_json_line_sink() {
        let mut sink = JsonLineSink::new(Vec::new());
        let payload = ExportPayload::new(Scenario::default(), &report(vec![vec![9]])).expect("payload");
        assert!(post(&mut sink, &payload));
        let text = String::from_utf8(sink.into_inner()).expect("utf8");
        assert!(text.ends_with('\n'));
        let line: serde_json::Value = serde_json::from_str(text.trim()).expect("json line");
        assert_eq!(line["method"], "postMessage");
        assert_eq!(line["result"]["data"], "[[9]]");
        assert_eq!(line["id"], serde_json::Value::Null);
    }
}
