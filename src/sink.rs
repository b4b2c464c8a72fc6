//! Changelist sinks
//!
//! Every completed cycle is handed to a [`ChangelistSink`] as a
//! [`CycleRecord`], including cycles where nothing changed.

use anyhow::Result;
use chrono::{DateTime, Utc};
use cncsnap_core::{CollectError, CycleReport, FieldValue, Update};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;

/// Longest text value [`LogSink`] writes out in full
const LOG_TEXT_LIMIT: usize = 80;

/// A field that could not be read during a cycle. `key` is the collector id
/// when one read feeds several fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    pub key: String,
    pub error: String,
}

impl From<&CollectError> for FieldFailure {
    fn from(err: &CollectError) -> Self {
        Self {
            key: err.key().to_string(),
            error: err.device_error().to_string(),
        }
    }
}

/// One published cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// Identifies one run of the poller
    pub session: Uuid,
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    /// Changes in collector registration order
    pub updates: Vec<Update>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldFailure>,
}

impl CycleRecord {
    pub fn from_report(session: Uuid, report: &CycleReport<'_>) -> Self {
        Self {
            session,
            cycle: report.cycle,
            timestamp: Utc::now(),
            updates: report.updates.to_vec(),
            field_errors: report.field_errors.iter().map(FieldFailure::from).collect(),
        }
    }
}

/// Destination for cycle changelists
pub trait ChangelistSink: Send {
    fn publish(&mut self, record: &CycleRecord) -> Result<()>;
}

/// Writes one JSON object per cycle
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ChangelistSink for JsonLinesSink<W> {
    fn publish(&mut self, record: &CycleRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Logs every update at info level
#[derive(Debug, Default)]
pub struct LogSink;

impl ChangelistSink for LogSink {
    fn publish(&mut self, record: &CycleRecord) -> Result<()> {
        info!(
            "Cycle {}: {} update(s)",
            record.cycle,
            record.updates.len()
        );
        for update in &record.updates {
            info!("  {} = {}", update.key, summarize(&update.value));
        }
        for failure in &record.field_errors {
            warn!("  {} unavailable: {}", failure.key, failure.error);
        }
        Ok(())
    }
}

/// Compact rendering of a value for log output
fn summarize(value: &FieldValue) -> String {
    match value {
        FieldValue::Integer(v) => v.to_string(),
        FieldValue::Text(text) if text.len() > LOG_TEXT_LIMIT => {
            format!("<{} bytes of text>", text.len())
        }
        FieldValue::Text(text) => format!("{:?}", text),
        FieldValue::TextList(names) => format!("{:?}", names),
        FieldValue::IntegerList(values) => format!("{:?}", values),
        FieldValue::Record(record) => {
            serde_json::to_string(record).unwrap_or_else(|_| format!("{:?}", record))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(updates: Vec<Update>) -> CycleRecord {
        CycleRecord {
            session: Uuid::new_v4(),
            cycle: 7,
            timestamp: Utc::now(),
            updates,
            field_errors: Vec::new(),
        }
    }

    #[test]
    fn test_json_lines_one_object_per_cycle() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.publish(&record(vec![Update::new("execution", "active")])).unwrap();
        sink.publish(&record(Vec::new())).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["cycle"], 7);
        assert_eq!(first["updates"][0]["key"], "execution");
        assert_eq!(first["updates"][0]["value"]["type"], "text");
        assert_eq!(first["updates"][0]["value"]["value"], "active");
        assert!(first.get("field_errors").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["updates"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_record_parses_back() {
        let mut rec = record(vec![
            Update::new("absolute", vec![100i64, 200]),
            Update::new("distance", FieldValue::IntegerList(Vec::new())),
            Update::new("axis_names", FieldValue::TextList(Vec::new())),
        ]);
        rec.field_errors.push(FieldFailure {
            key: "program".to_string(),
            error: "device request timed out".to_string(),
        });
        let json = serde_json::to_string(&rec).unwrap();
        let parsed: CycleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rec);
    }

    #[test]
    fn test_summarize_long_text() {
        let long = FieldValue::Text("G01 X1.\n".repeat(20));
        assert_eq!(summarize(&long), "<160 bytes of text>");
        assert_eq!(summarize(&FieldValue::Integer(3)), "3");
        assert_eq!(summarize(&FieldValue::from("active")), "\"active\"");
        assert_eq!(summarize(&FieldValue::from(vec![1i64, 2])), "[1, 2]");
    }

    #[test]
    fn test_log_sink_accepts_empty_cycle() {
        assert!(LogSink.publish(&record(Vec::new())).is_ok());
    }
}
