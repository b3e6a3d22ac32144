use std::borrow::Cow;
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::filter::engine::PatternError;

/// Dialect tag carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Apache common log format
    Apache,
    /// Nginx combined format (apache + referer + user-agent)
    Nginx,
    /// BSD-style syslog without priority prefix
    Syslog,
    /// Windows event export lines
    WindowsEvent,
    Json,
    Csv,
    Xml,
    /// Text line no grammar matched
    Unknown,
    /// Line of line-delimited JSON that failed to decode
    JsonError,
    /// CSV row the reader could not decode
    CsvError,
    /// XML document that failed to parse
    XmlError,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Apache => "apache",
            LogFormat::Nginx => "nginx",
            LogFormat::Syslog => "syslog",
            LogFormat::WindowsEvent => "windows_event",
            LogFormat::Json => "json",
            LogFormat::Csv => "csv",
            LogFormat::Xml => "xml",
            LogFormat::Unknown => "unknown",
            LogFormat::JsonError => "json_error",
            LogFormat::CsvError => "csv_error",
            LogFormat::XmlError => "xml_error",
        }
    }

    /// True for the tags produced when an input unit could not be decoded.
    pub fn is_downgrade(&self) -> bool {
        matches!(
            self,
            LogFormat::Unknown | LogFormat::JsonError | LogFormat::CsvError | LogFormat::XmlError
        )
    }
}

/// Record severity.
///
/// The keyword classifier only ever yields `Error`, `Warning`, `Info` or
/// `Debug`; `Critical` can arrive through structured inputs (JSON/CSV/XML)
/// that carry their own severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Counts toward the error rate and error-burst detection.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Critical | Severity::Error)
    }

    /// Parse a severity label supplied by a structured record.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" | "CRIT" | "FATAL" => Some(Severity::Critical),
            "ERROR" | "ERR" => Some(Severity::Error),
            "WARNING" | "WARN" => Some(Severity::Warning),
            "INFO" | "INFORMATION" | "NOTICE" => Some(Severity::Info),
            "DEBUG" | "TRACE" | "VERBOSE" => Some(Severity::Debug),
            _ => None,
        }
    }
}

/// One unparsed input: payload bytes plus a source hint
/// (file extension, explicit dialect tag or transport label).
#[derive(Debug, Clone)]
pub struct RawInput {
    pub content: Bytes,
    pub hint: String,
}

impl RawInput {
    pub fn new(content: impl Into<Bytes>, hint: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            hint: hint.into(),
        }
    }

    /// Use the file extension of `path` as the hint.
    pub fn from_path(path: &Path, content: impl Into<Bytes>) -> Self {
        let hint = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self::new(content, hint)
    }

    /// Decode the payload, substituting undecodable sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid grammar '{name}': {source}")]
    InvalidGrammar {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

/// Normalized log record.
///
/// Well-known fields are typed; anything dialect-specific lands in `fields`
/// in insertion order. Serialization (see `serde_utils`) flattens `fields`
/// next to the well-known keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Original line or element, always retained
    pub raw: String,
    pub format: LogFormat,
    pub timestamp: Option<String>,
    pub ip: Option<String>,
    pub user: Option<String>,
    pub method: Option<String>,
    pub path: Option<String>,
    pub protocol: Option<String>,
    pub status: Option<String>,
    pub size: Option<String>,
    pub message: Option<String>,
    pub user_agent: Option<String>,
    pub severity: Severity,
    pub fields: Vec<(String, Value)>,
}

impl LogRecord {
    pub fn new(raw: impl Into<String>, format: LogFormat) -> Self {
        Self {
            raw: raw.into(),
            format,
            timestamp: None,
            ip: None,
            user: None,
            method: None,
            path: None,
            protocol: None,
            status: None,
            size: None,
            message: None,
            user_agent: None,
            severity: Severity::default(),
            fields: Vec::new(),
        }
    }

    /// A text line no grammar matched. The timestamp is the parse time,
    /// not a log time.
    pub fn unknown(raw: impl Into<String>, parsed_at: &str) -> Self {
        let mut record = Self::new(raw, LogFormat::Unknown);
        record.timestamp = Some(parsed_at.to_string());
        record
    }

    /// An input unit that failed to decode (`json_error`, `csv_error`, `xml_error`).
    pub fn failed(raw: impl Into<String>, format: LogFormat) -> Self {
        Self::new(raw, format)
    }

    /// Look up a dialect-specific extra.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace a dialect-specific extra, keeping first-insertion position.
    pub fn push_extra(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Route a key from a structured source: well-known names fill the typed
    /// fields, `raw`/`type` are kept as `source_raw`/`source_type`, the rest
    /// become extras.
    pub fn set_field(&mut self, key: &str, value: Value) {
        let slot = match key {
            "timestamp" => &mut self.timestamp,
            "ip" => &mut self.ip,
            "user" => &mut self.user,
            "method" => &mut self.method,
            "path" => &mut self.path,
            "protocol" => &mut self.protocol,
            "status" => &mut self.status,
            "size" => &mut self.size,
            "message" => &mut self.message,
            "user_agent" => &mut self.user_agent,
            "severity" => {
                match value.as_str().and_then(Severity::from_label) {
                    Some(severity) => self.severity = severity,
                    None => self.push_extra("severity_label", value),
                }
                return;
            }
            "raw" => return self.push_extra("source_raw", value),
            "type" => return self.push_extra("source_type", value),
            _ => return self.push_extra(key, value),
        };
        *slot = scalar_to_string(&value);
    }

    /// Textual representation used by the content scanners: the record's
    /// serialized mapping, falling back to the raw line.
    pub fn text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.raw.clone())
    }
}

/// Stringify a JSON scalar; `null` becomes absent, containers keep their JSON text.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_tags() {
        assert_eq!(LogFormat::WindowsEvent.as_str(), "windows_event");
        assert_eq!(LogFormat::JsonError.as_str(), "json_error");
        assert!(LogFormat::Unknown.is_downgrade());
        assert!(!LogFormat::Apache.is_downgrade());
    }

    #[test]
    fn test_severity_default_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
        assert!(Severity::Critical.is_error());
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
    }

    #[test]
    fn test_severity_from_label() {
        assert_eq!(Severity::from_label("error"), Some(Severity::Error));
        assert_eq!(Severity::from_label(" Warn "), Some(Severity::Warning));
        assert_eq!(Severity::from_label("CRITICAL"), Some(Severity::Critical));
        assert_eq!(Severity::from_label("loud"), None);
    }

    #[test]
    fn test_raw_input_hint_from_path() {
        let input = RawInput::from_path(Path::new("/var/log/events.JSON"), "[]");
        assert_eq!(input.hint, "json");

        let input = RawInput::from_path(Path::new("/var/log/syslog"), "x");
        assert_eq!(input.hint, "");
    }

    #[test]
    fn test_raw_input_lossy_text() {
        let input = RawInput::new(&b"ok \xFF\xFE line"[..], "log");
        let text = input.text();
        assert!(text.starts_with("ok "));
        assert!(text.ends_with(" line"));
    }

    #[test]
    fn test_set_field_routes_well_known_keys() {
        let mut record = LogRecord::new("{}", LogFormat::Json);
        record.set_field("ip", json!("10.0.0.1"));
        record.set_field("status", json!(404));
        record.set_field("severity", json!("warn"));
        record.set_field("hostname", json!("web-1"));

        assert_eq!(record.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(record.status.as_deref(), Some("404"));
        assert_eq!(record.severity, Severity::Warning);
        assert_eq!(record.field("hostname"), Some(&json!("web-1")));
    }

    #[test]
    fn test_set_field_keeps_reserved_keys_as_extras() {
        let mut record = LogRecord::new("line", LogFormat::Json);
        record.set_field("type", json!("audit"));
        record.set_field("raw", json!("original"));

        assert_eq!(record.format, LogFormat::Json);
        assert_eq!(record.raw, "line");
        assert_eq!(record.field("source_type"), Some(&json!("audit")));
        assert_eq!(record.field("source_raw"), Some(&json!("original")));
    }

    #[test]
    fn test_unrecognized_severity_is_preserved() {
        let mut record = LogRecord::new("x", LogFormat::Csv);
        record.set_field("severity", json!("sev-7"));
        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.field("severity_label"), Some(&json!("sev-7")));
    }

    #[test]
    fn test_push_extra_replaces_in_place() {
        let mut record = LogRecord::new("x", LogFormat::Xml);
        record.push_extra("tag", json!("a"));
        record.push_extra("text", json!(""));
        record.push_extra("tag", json!("b"));
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields[0], ("tag".to_string(), json!("b")));
    }

    #[test]
    fn test_unknown_record_carries_parse_time() {
        let record = LogRecord::unknown("garbage", "2026-01-01T00:00:00Z");
        assert_eq!(record.format, LogFormat::Unknown);
        assert_eq!(record.timestamp.as_deref(), Some("2026-01-01T00:00:00Z"));
    }
}
