use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::analysis::Statistics;
use crate::parser::LogRecord;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Advisory collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Advisory timed out after {0}ms")]
    Timeout(u64),

    #[error("Advisory I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bounded hand-off to the advisory collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryRequest {
    /// First records of the batch
    pub sample: Vec<LogRecord>,
    /// Smaller illustrative prefix of `sample`
    pub illustrative: Vec<LogRecord>,
    pub total_logs: usize,
    pub error_rate: f64,
}

impl AdvisoryRequest {
    pub fn from_records(
        records: &[LogRecord],
        statistics: &Statistics,
        sample_size: usize,
        illustrative_size: usize,
    ) -> Self {
        let sample: Vec<LogRecord> = records.iter().take(sample_size).cloned().collect();
        let illustrative = sample.iter().take(illustrative_size).cloned().collect();
        Self {
            sample,
            illustrative,
            total_logs: statistics.total_logs,
            error_rate: statistics.error_rate,
        }
    }
}

/// Decoded advisory. Every list may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Advisory {
    pub concerns: Vec<String>,
    pub patterns: Vec<String>,
    pub recommendations: Vec<String>,
    pub priority_actions: Vec<String>,
}

impl Advisory {
    /// Decode the outermost `{...}` span of a free-form response.
    ///
    /// Missing keys stay empty and non-string items are stringified. A
    /// response without a decodable object is the empty advisory.
    pub fn from_response(text: &str) -> Self {
        let span = match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => &text[start..=end],
            _ => return Self::default(),
        };

        match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(map)) => Self {
                concerns: string_list(map.get("concerns")),
                patterns: string_list(map.get("patterns")),
                recommendations: string_list(map.get("recommendations")),
                priority_actions: string_list(map.get("priority_actions")),
            },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.concerns.is_empty()
            && self.patterns.is_empty()
            && self.recommendations.is_empty()
            && self.priority_actions.is_empty()
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(item_text).collect(),
        Some(other) => item_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
