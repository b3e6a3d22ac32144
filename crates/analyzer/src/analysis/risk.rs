//! Risk Summarizer.

use super::error::AnalysisError;
use super::model::{Anomaly, RiskLevel, RiskSummary, SecurityIssue, Statistics};
use crate::advisory::Advisory;

const MAIN_CONCERNS: usize = 3;
const IMMEDIATE_ACTIONS: usize = 3;

/// Reduce detector output to a verdict.
///
/// `critical` if any anomaly is critical; `high` if more than two are high;
/// `medium` if at least one is high; otherwise `low`. Missing statistics is a
/// caller error. A missing advisory only leaves `immediate_actions` empty.
pub fn summarize(
    statistics: Option<&Statistics>,
    anomalies: &[Anomaly],
    security_issues: &[SecurityIssue],
    advisory: Option<&Advisory>,
) -> Result<RiskSummary, AnalysisError> {
    let statistics = statistics.ok_or(AnalysisError::MissingInput("statistics"))?;

    let critical = anomalies
        .iter()
        .filter(|a| a.severity == RiskLevel::Critical)
        .count();
    let high = anomalies
        .iter()
        .filter(|a| a.severity == RiskLevel::High)
        .count();

    let risk_level = if critical > 0 {
        RiskLevel::Critical
    } else if high > 2 {
        RiskLevel::High
    } else if high > 0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    Ok(RiskSummary {
        risk_level,
        total_logs: statistics.total_logs,
        total_anomalies: anomalies.len(),
        critical_issues: critical,
        main_concerns: security_issues
            .iter()
            .take(MAIN_CONCERNS)
            .map(|issue| issue.description.clone())
            .collect(),
        immediate_actions: advisory
            .map(|a| a.priority_actions.iter().take(IMMEDIATE_ACTIONS).cloned().collect())
            .unwrap_or_default(),
    })
}
