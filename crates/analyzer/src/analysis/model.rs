//! Analysis output types.
//!
//! Everything here is produced fresh per batch and serialized as-is into the
//! report; nothing is mutated after construction.

use serde::{Deserialize, Serialize};

use crate::parser::serde_utils::serialize_pairs_as_map;
use crate::parser::{LogRecord, Severity};

/// Tunable detector thresholds. Defaults reproduce the fixed constants of the
/// detection rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholds {
    /// Length of the top-N histograms
    pub top_n: usize,
    /// IPs above `mean + frequency_sigma * stddev` are outliers
    pub frequency_sigma: f64,
    /// Error-severity records required before burst bucketing runs (strictly more than)
    pub burst_gate: usize,
    /// Errors in one minute required to report a burst (strictly more than)
    pub burst_size: usize,
    /// How many of the most frequent user agents are checked for bot markers
    pub bot_top_n: usize,
    /// Failed-login records required to report brute force (strictly more than)
    pub brute_force_min: usize,
    /// Share of 5xx records above which a high error rate is reported
    pub server_error_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            top_n: 10,
            frequency_sigma: 3.0,
            burst_gate: 10,
            burst_size: 5,
            bot_top_n: 5,
            brute_force_min: 5,
            server_error_ratio: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    HighFrequencyIp,
    ErrorBurst,
    SqlInjectionAttempt,
    XssAttempt,
    PathTraversalAttempt,
    BotActivity,
    BruteForceAttempt,
    SensitiveDataExposure,
    HighErrorRate,
}

/// Type-specific payload, flattened next to the common finding keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evidence {
    Ip { ip: String, count: usize },
    Window { timestamp: String, count: usize },
    Record { details: LogRecord },
    UserAgent { user_agent: String, count: usize },
    Count { count: usize },
    Percentage { percentage: f64 },
}

/// One detector hit. Anomalies, security issues and patterns share this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: RiskLevel,
    pub description: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

impl Finding {
    pub fn new(kind: FindingKind, severity: RiskLevel, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

pub type Anomaly = Finding;
pub type SecurityIssue = Finding;
pub type Pattern = Finding;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpCount {
    pub ip: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathCount {
    pub path: String,
    pub count: usize,
}

/// Aggregate snapshot over one record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_logs: usize,
    pub unique_ips: usize,
    /// Every severity seen, in first-seen order
    #[serde(serialize_with = "serialize_pairs_as_map")]
    pub severity_distribution: Vec<(Severity, usize)>,
    /// Top-N status codes, descending
    #[serde(serialize_with = "serialize_pairs_as_map")]
    pub status_codes: Vec<(String, usize)>,
    pub top_ips: Vec<IpCount>,
    pub top_paths: Vec<PathCount>,
    /// Percentage of ERROR/CRITICAL records, in `[0, 100]`
    pub error_rate: f64,
}

/// Output of one anomaly scan: anomalies plus the behavioral patterns found
/// by the same pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Detections {
    pub anomalies: Vec<Anomaly>,
    pub patterns: Vec<Pattern>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub risk_level: RiskLevel,
    pub total_logs: usize,
    pub total_anomalies: usize,
    /// Anomalies with severity `critical`
    pub critical_issues: usize,
    pub main_concerns: Vec<String>,
    pub immediate_actions: Vec<String>,
}

/// The externally visible result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: RiskSummary,
    pub statistics: Statistics,
    pub anomalies: Vec<Anomaly>,
    pub patterns: Vec<Pattern>,
    pub security_issues: Vec<SecurityIssue>,
    /// Advisory recommendations, empty when no advisory was available
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LogFormat;
    use serde_json::json;

    #[test]
    fn test_finding_flattens_evidence() {
        let finding = Finding::new(FindingKind::HighFrequencyIp, RiskLevel::High, "busy")
            .with_evidence(Evidence::Ip { ip: "10.0.0.1".into(), count: 95 });

        assert_eq!(
            serde_json::to_value(&finding).unwrap(),
            json!({
                "type": "high_frequency_ip",
                "severity": "high",
                "description": "busy",
                "ip": "10.0.0.1",
                "count": 95
            })
        );
    }

    #[test]
    fn test_finding_without_evidence() {
        let finding = Finding::new(FindingKind::SensitiveDataExposure, RiskLevel::Critical, "leak");
        assert_eq!(
            serde_json::to_value(&finding).unwrap(),
            json!({"type": "sensitive_data_exposure", "severity": "critical", "description": "leak"})
        );
    }

    #[test]
    fn test_record_evidence_nests_full_record() {
        let mut record = LogRecord::new("GET /x", LogFormat::Unknown);
        record.path = Some("/x".into());
        let finding = Finding::new(FindingKind::XssAttempt, RiskLevel::High, "xss")
            .with_evidence(Evidence::Record { details: record });

        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["details"]["path"], json!("/x"));
        assert_eq!(value["details"]["type"], json!("unknown"));
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::Medium > RiskLevel::Low);
        assert_eq!(RiskLevel::Medium.as_str(), "medium");
    }

    #[test]
    fn test_statistics_histograms_serialize_as_ordered_maps() {
        let stats = Statistics {
            total_logs: 3,
            unique_ips: 1,
            severity_distribution: vec![(Severity::Error, 2), (Severity::Info, 1)],
            status_codes: vec![("500".into(), 2), ("200".into(), 1)],
            top_ips: vec![IpCount { ip: "1.2.3.4".into(), count: 3 }],
            top_paths: vec![],
            error_rate: 66.66,
        };
        let text = serde_json::to_string(&stats).unwrap();
        assert!(text.contains(r#""severity_distribution":{"ERROR":2,"INFO":1}"#));
        assert!(text.contains(r#""status_codes":{"500":2,"200":1}"#));
    }
}
