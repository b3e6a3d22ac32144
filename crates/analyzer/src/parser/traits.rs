pub use super::model::{LogFormat, LogRecord, ParseError, RawInput, Severity};

/// A line-oriented dialect grammar.
pub trait LineGrammar: Send + Sync {
    /// Match a single line, returning the extracted record on success.
    fn extract(&self, line: &str) -> Option<LogRecord>;
    fn format(&self) -> LogFormat;
}

pub trait DocumentParser: Send + Sync {
    /// Parse a whole document; never fails, undecodable units become error-tagged records.
    fn parse_document(&self, content: &str) -> Vec<LogRecord>;
    fn format(&self) -> LogFormat;
}
