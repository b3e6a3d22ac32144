//! Regex-backed line grammar: one compiled pattern plus a named-group to
//! field mapping.

use regex::Regex;
use serde_json::Value;

use super::traits::{LineGrammar, LogFormat, LogRecord, ParseError};

/// A dialect grammar anchored at the start of the line.
///
/// Only the start is anchored, so a grammar also accepts lines that carry
/// trailing fields it does not know about. That is what lets `apache`
/// claim `nginx` lines when it is tried first.
#[derive(Debug)]
pub struct RegexGrammar {
    format: LogFormat,
    regex: Regex,
    groups: Vec<String>,
}

impl RegexGrammar {
    pub fn new(format: LogFormat, pattern: &str) -> Result<Self, ParseError> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            ParseError::InvalidGrammar {
                name: format.as_str(),
                source,
            }
        })?;
        let groups = regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();

        Ok(Self { format, regex, groups })
    }
}

impl LineGrammar for RegexGrammar {
    fn extract(&self, line: &str) -> Option<LogRecord> {
        let caps = self.regex.captures(line)?;
        let mut record = LogRecord::new(line, self.format);
        for name in &self.groups {
            if let Some(m) = caps.name(name) {
                record.set_field(name, Value::String(m.as_str().to_string()));
            }
        }
        Some(record)
    }

    fn format(&self) -> LogFormat {
        self.format
    }
}
