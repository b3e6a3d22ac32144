//! Keyword-based severity inference.

use crate::filter::{Patterns, PatternError, SignatureMatcher};
use super::model::Severity;

/// Applies the keyword families in fixed priority: ERROR, WARNING, INFO,
/// DEBUG. First family that matches wins; no match means `INFO`.
#[derive(Debug)]
pub struct SeverityClassifier {
    families: Vec<(Severity, SignatureMatcher)>,
}

impl SeverityClassifier {
    pub fn new() -> Result<Self, PatternError> {
        let families = vec![
            (Severity::Error, SignatureMatcher::case_insensitive(Patterns::SEVERITY_ERROR)?),
            (Severity::Warning, SignatureMatcher::case_insensitive(Patterns::SEVERITY_WARNING)?),
            (Severity::Info, SignatureMatcher::case_insensitive(Patterns::SEVERITY_INFO)?),
            (Severity::Debug, SignatureMatcher::case_insensitive(Patterns::SEVERITY_DEBUG)?),
        ];
        Ok(Self { families })
    }

    pub fn classify(&self, text: &str) -> Severity {
        self.families
            .iter()
            .find(|(_, matcher)| matcher.is_match_str(text))
            .map(|(severity, _)| *severity)
            .unwrap_or_default()
    }
}
