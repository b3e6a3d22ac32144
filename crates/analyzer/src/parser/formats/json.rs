use serde_json::Value;
use tracing::debug;

use crate::parser::traits::*;

/// JSON document parser.
///
/// Tries the whole payload as one value first (array of events or a single
/// event). When that fails the payload is treated as line-delimited JSON and
/// every non-blank line is decoded on its own; a line that still fails
/// becomes a `json_error` record carrying the line as `raw`.
#[derive(Debug, Default)]
pub struct JsonDocumentParser;

impl JsonDocumentParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_lines(&self, content: &str) -> Vec<LogRecord> {
        content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(|line| match serde_json::from_str::<Value>(line) {
                Ok(value) => value_to_record(line.to_string(), value),
                Err(e) => {
                    debug!(error = %e, "Undecodable JSON line");
                    LogRecord::failed(line, LogFormat::JsonError)
                }
            })
            .collect()
    }
}

impl DocumentParser for JsonDocumentParser {
    fn parse_document(&self, content: &str) -> Vec<LogRecord> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .map(|item| value_to_record(item.to_string(), item))
                .collect(),
            Ok(value) => vec![value_to_record(content.trim().to_string(), value)],
            Err(_) => self.parse_lines(content),
        }
    }

    fn format(&self) -> LogFormat {
        LogFormat::Json
    }
}

/// Spread an object's keys onto a record; anything else is kept as `message`.
fn value_to_record(raw: String, value: Value) -> LogRecord {
    let mut record = LogRecord::new(raw, LogFormat::Json);
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                record.set_field(&key, value);
            }
        }
        other => record.set_field("message", other),
    }
    record
}
