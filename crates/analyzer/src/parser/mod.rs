/// Log normalization module
///
/// Turns raw input blobs into a stream of normalized [`LogRecord`]s.
///
/// # Architecture
///
/// - `model.rs`: RawInput, LogRecord, LogFormat, Severity, ParseError
/// - `traits.rs`: LineGrammar / DocumentParser seams
/// - `grammar.rs`: regex-backed line grammars
/// - `detector.rs`: hint-based dispatch and the ordered grammar chain
/// - `formats/`: one file per dialect
/// - `severity.rs`, `normalize.rs`: per-record post-processing
/// - `metrics.rs`: parse counters
///
/// # Guarantees
///
/// - Data-shape problems never fail a parse; they produce downgraded records
/// - Non-UTF8 bytes are replaced, not rejected
/// - Line order within one input is preserved

pub mod detector;
pub mod formats;
pub mod grammar;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod serde_utils;
pub mod severity;
pub mod traits;

use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use detector::{DocumentKind, GrammarChain};
use formats::{CsvDocumentParser, JsonDocumentParser, UnknownLine, XmlDocumentParser};
use traits::DocumentParser;

pub use metrics::{MetricsSnapshot, ParsingMetrics};
pub use model::{LogFormat, LogRecord, ParseError, RawInput, Severity};
pub use normalize::normalize_ip;
pub use severity::SeverityClassifier;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB

/// Entry point of the normalization pipeline. Cheap to share behind an `Arc`;
/// every method takes `&self`.
#[derive(Debug)]
pub struct LogParser {
    chain: GrammarChain,
    classifier: SeverityClassifier,
    json: JsonDocumentParser,
    csv: CsvDocumentParser,
    xml: XmlDocumentParser,
    metrics: Arc<ParsingMetrics>,
}

impl LogParser {
    pub fn new() -> Result<Self, ParseError> {
        Self::with_metrics(Arc::new(ParsingMetrics::new()))
    }

    pub fn with_metrics(metrics: Arc<ParsingMetrics>) -> Result<Self, ParseError> {
        Ok(Self {
            chain: GrammarChain::new()?,
            classifier: SeverityClassifier::new()?,
            json: JsonDocumentParser::new(),
            csv: CsvDocumentParser::new(),
            xml: XmlDocumentParser::new(),
            metrics,
        })
    }

    pub fn metrics(&self) -> &Arc<ParsingMetrics> {
        &self.metrics
    }

    /// Parse one input into a one-pass record stream.
    ///
    /// Text inputs are matched line by line as the stream is pulled.
    /// JSON, CSV and XML documents are decoded up front and then replayed.
    pub fn parse(&self, input: RawInput) -> RecordStream<'_> {
        let content = input.text().into_owned();
        match DocumentKind::from_hint(&input.hint) {
            DocumentKind::Json => self.document(self.json.parse_document(&content)),
            DocumentKind::Csv => self.document(self.csv.parse_document(&content)),
            DocumentKind::Xml => self.document(self.xml.parse_document(&content)),
            DocumentKind::Text => {
                let parsed_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
                RecordStream::Text(TextRecords {
                    parser: self,
                    content,
                    offset: 0,
                    fallback: UnknownLine::new(parsed_at),
                })
            }
        }
    }

    /// Drain [`parse`](Self::parse) into a vector and record the input's timing.
    pub fn parse_all(&self, input: RawInput) -> Vec<LogRecord> {
        let start = Instant::now();
        let hint = input.hint.clone();
        let bytes = input.content.len();

        let records: Vec<LogRecord> = self.parse(input).collect();

        self.metrics.record_input(start.elapsed().as_nanos() as u64);
        info!(hint = %hint, bytes, records = records.len(), "Parsed input");
        records
    }

    fn document(&self, records: Vec<LogRecord>) -> RecordStream<'_> {
        RecordStream::Document(DocumentRecords {
            metrics: &self.metrics,
            records: records.into_iter(),
        })
    }

    /// Match one non-blank text line, then tag severity and normalize the IP.
    fn parse_line(&self, line: &str, fallback: &UnknownLine) -> LogRecord {
        let mut record = if line.len() > MAX_LINE_SIZE {
            self.metrics.record_too_large();
            debug!(error = %ParseError::LineTooLarge(line.len(), MAX_LINE_SIZE), "Skipping grammars");
            fallback.record(line)
        } else {
            self.chain
                .extract(line)
                .unwrap_or_else(|| fallback.record(line))
        };

        record.severity = self.classifier.classify(line);
        if let Some(ip) = record.ip.take() {
            record.ip = Some(normalize_ip(&ip));
        }
        record
    }
}

/// Lazy, finite, non-restartable sequence of records from one input.
pub enum RecordStream<'p> {
    Text(TextRecords<'p>),
    Document(DocumentRecords<'p>),
}

impl Iterator for RecordStream<'_> {
    type Item = LogRecord;

    fn next(&mut self) -> Option<LogRecord> {
        match self {
            RecordStream::Text(inner) => inner.next(),
            RecordStream::Document(inner) => inner.next(),
        }
    }
}

pub struct TextRecords<'p> {
    parser: &'p LogParser,
    content: String,
    offset: usize,
    fallback: UnknownLine,
}

impl Iterator for TextRecords<'_> {
    type Item = LogRecord;

    fn next(&mut self) -> Option<LogRecord> {
        while self.offset < self.content.len() {
            let start = self.offset;
            let end = self.content[start..]
                .find('\n')
                .map(|i| start + i)
                .unwrap_or(self.content.len());
            self.offset = end + 1;

            let line = &self.content[start..end];
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }

            let record = self.parser.parse_line(line, &self.fallback);
            self.parser.metrics.record_emitted(record.format);
            if record.format.is_downgrade() {
                debug!(format = record.format.as_str(), "Line downgraded");
            }
            return Some(record);
        }
        None
    }
}

pub struct DocumentRecords<'p> {
    metrics: &'p ParsingMetrics,
    records: std::vec::IntoIter<LogRecord>,
}

impl Iterator for DocumentRecords<'_> {
    type Item = LogRecord;

    fn next(&mut self) -> Option<LogRecord> {
        let record = self.records.next()?;
        self.metrics.record_emitted(record.format);
        if record.format.is_downgrade() {
            debug!(format = record.format.as_str(), "Unit downgraded");
        }
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parser() -> LogParser {
        LogParser::new().expect("built-in grammars compile")
    }

    fn parse(content: &str, hint: &str) -> Vec<LogRecord> {
        parser().parse(RawInput::new(content.to_string(), hint)).collect()
    }

    #[test]
    fn test_apache_scenario() {
        let line = r#"192.168.1.1 - alice [10/Oct/2023:13:55:36] "GET /admin HTTP/1.1" 200 512"#;
        let records = parse(line, "log");
        assert_eq!(records.len(), 1);

        let value = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(
            value,
            json!({
                "raw": line,
                "type": "apache",
                "timestamp": "10/Oct/2023:13:55:36",
                "ip": "192.168.1.1",
                "user": "alice",
                "method": "GET",
                "path": "/admin",
                "protocol": "HTTP/1.1",
                "status": "200",
                "size": "512",
                "severity": "INFO"
            })
        );
    }

    #[test]
    fn test_text_lines_in_order_with_fallback() {
        let content = "Oct 11 22:14:15 host sshd[1]: error: auth failure\n\n   \nrandom junk\r\n2026-01-01 00:00:00 Warning Svc 7 low disk\n";
        let records = parse(content, "");
        let formats: Vec<LogFormat> = records.iter().map(|r| r.format).collect();
        assert_eq!(formats, vec![LogFormat::Syslog, LogFormat::Unknown, LogFormat::WindowsEvent]);

        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(records[1].raw, "random junk");
        assert!(records[1].timestamp.is_some());
        assert_eq!(records[2].severity, Severity::Warning);
    }

    #[test]
    fn test_unknown_lines_share_parse_time() {
        let records = parse("one\ntwo\n", "txt");
        assert_eq!(records[0].timestamp, records[1].timestamp);
    }

    #[test]
    fn test_ip_is_normalized() {
        let line = r#"010.001.000.007 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1"#;
        let records = parse(line, "log");
        assert_eq!(records[0].ip.as_deref(), Some("10.1.0.7"));
    }

    #[test]
    fn test_dispatch_by_hint() {
        assert_eq!(parse(r#"[{"a":1}]"#, "json")[0].format, LogFormat::Json);
        assert_eq!(parse("a,b\n1,2\n", "csv")[0].format, LogFormat::Csv);
        assert_eq!(parse("<r><e/></r>", "xml")[0].format, LogFormat::Xml);
        // Same JSON payload as text is just an unknown line.
        assert_eq!(parse(r#"[{"a":1}]"#, "log")[0].format, LogFormat::Unknown);
    }

    #[test]
    fn test_structured_records_keep_their_severity() {
        let records = parse(r#"{"message":"fatal crash"}"#, "json");
        assert_eq!(records[0].severity, Severity::Info);
    }

    #[test]
    fn test_non_utf8_is_replaced() {
        let input = RawInput::new(&b"ok line\nbad \xFF\xFE line\n"[..], "log");
        let records: Vec<LogRecord> = parser().parse(input).collect();
        assert_eq!(records.len(), 2);
        assert!(records[1].raw.contains('\u{FFFD}'));
    }

    #[test]
    fn test_oversized_line_is_downgraded() {
        let p = parser();
        let mut line = String::from(r#"1.2.3.4 - - [x] "GET / HTTP/1.1" 200 1 "#);
        line.push_str(&"A".repeat(MAX_LINE_SIZE));

        let records: Vec<LogRecord> = p.parse(RawInput::new(line.clone(), "log")).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].format, LogFormat::Unknown);
        assert_eq!(records[0].raw.len(), line.len());
        assert_eq!(p.metrics().snapshot().lines_too_large, 1);
    }

    #[test]
    fn test_stream_is_lazy_and_one_pass() {
        let p = parser();
        let mut stream = p.parse(RawInput::new("a\nb\nc\n", "log"));
        assert_eq!(stream.next().map(|r| r.raw), Some("a".to_string()));
        assert_eq!(p.metrics().snapshot().total_records, 1);
        assert_eq!(stream.by_ref().count(), 2);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_parse_all_records_metrics() {
        let p = parser();
        let records = p.parse_all(RawInput::new("{bad\n{\"a\":1}\n", "json"));
        assert_eq!(records.len(), 2);

        let snap = p.metrics().snapshot();
        assert_eq!(snap.inputs, 1);
        assert_eq!(snap.json, 1);
        assert_eq!(snap.json_error, 1);
    }
}
