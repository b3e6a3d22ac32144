use crate::parser::traits::*;

/// Fallback for text lines no grammar claims.
///
/// The record's timestamp is the time of the parse call, shared by every
/// fallback record of that call.
#[derive(Debug, Clone)]
pub struct UnknownLine {
    parsed_at: String,
}

impl UnknownLine {
    pub fn new(parsed_at: impl Into<String>) -> Self {
        Self {
            parsed_at: parsed_at.into(),
        }
    }

    pub fn record(&self, line: &str) -> LogRecord {
        LogRecord::unknown(line, &self.parsed_at)
    }
}
