use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use tracing::debug;

use crate::parser::traits::*;

/// CSV document parser: first row is the header, every following row one record.
///
/// Short rows fill only the columns they have. Cells beyond the header width
/// are kept in order under `extra_values`. A row the reader cannot decode
/// becomes a `csv_error` record.
#[derive(Debug, Default)]
pub struct CsvDocumentParser;

impl CsvDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for CsvDocumentParser {
    fn parse_document(&self, content: &str) -> Vec<LogRecord> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => {
                debug!(error = %e, "Unreadable CSV header");
                return vec![LogRecord::failed(content, LogFormat::CsvError)];
            }
        };

        // Row start offsets come first so each row's raw text can run to the next one.
        let rows: Vec<(Option<usize>, Result<StringRecord, csv::Error>)> = reader
            .records()
            .map(|row| {
                let start = match &row {
                    Ok(row) => row.position().map(|pos| pos.byte() as usize),
                    Err(e) => e.position().map(|pos| pos.byte() as usize),
                };
                (start, row)
            })
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        for (i, (start, row)) in rows.iter().enumerate() {
            let end = rows[i + 1..]
                .iter()
                .find_map(|(next, _)| *next)
                .unwrap_or(content.len());
            let raw = start.and_then(|start| source_span(content, start, end));

            match row {
                Ok(row) => records.push(row_to_record(&headers, row, raw)),
                Err(e) => {
                    debug!(error = %e, "Undecodable CSV row");
                    records.push(LogRecord::failed(raw.unwrap_or_default(), LogFormat::CsvError));
                }
            }
        }
        records
    }

    fn format(&self) -> LogFormat {
        LogFormat::Csv
    }
}

/// Source text of one row, without surrounding line terminators.
fn source_span(content: &str, start: usize, end: usize) -> Option<&str> {
    content
        .get(start..end.max(start))
        .map(|span| span.trim_matches(['\r', '\n']))
}

/// `raw` is the row's source text; the rejoined cells stand in when the
/// reader reports no position.
fn row_to_record(headers: &StringRecord, row: &StringRecord, raw: Option<&str>) -> LogRecord {
    let raw = match raw {
        Some(raw) => raw.to_string(),
        None => row.iter().collect::<Vec<_>>().join(","),
    };
    let mut record = LogRecord::new(raw, LogFormat::Csv);

    for (key, value) in headers.iter().zip(row.iter()) {
        record.set_field(key, Value::String(value.to_string()));
    }

    if row.len() > headers.len() {
        let extra = row
            .iter()
            .skip(headers.len())
            .map(|v| Value::String(v.to_string()))
            .collect();
        record.push_extra("extra_values", Value::Array(extra));
    }
    record
}
