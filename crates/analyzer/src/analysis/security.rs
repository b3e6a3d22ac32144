//! Security Issue Identifier.

use super::model::{Evidence, Finding, FindingKind, RiskLevel, SecurityIssue, Thresholds};
use super::stats::percentage;
use crate::filter::SignatureMatcher;
use crate::parser::LogRecord;

pub fn identify(records: &[LogRecord], thresholds: &Thresholds, sensitive: &SignatureMatcher) -> Vec<SecurityIssue> {
    let mut issues = Vec::new();

    // Stops at the first exposing record: at most one finding per batch.
    if records.iter().any(|r| sensitive.is_match_str(&r.text())) {
        issues.push(Finding::new(
            FindingKind::SensitiveDataExposure,
            RiskLevel::Critical,
            "Potential sensitive data exposure in logs",
        ));
    }

    let server_errors = records
        .iter()
        .filter(|r| r.status.as_deref().is_some_and(|s| s.starts_with('5')))
        .count();
    if server_errors as f64 > records.len() as f64 * thresholds.server_error_ratio {
        issues.push(
            Finding::new(
                FindingKind::HighErrorRate,
                RiskLevel::Medium,
                format!("High server error rate: {} 5xx errors", server_errors),
            )
            .with_evidence(Evidence::Percentage {
                percentage: percentage(server_errors, records.len()),
            }),
        );
    }

    issues
}
