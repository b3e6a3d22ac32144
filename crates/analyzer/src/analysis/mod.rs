//! Statistics, anomaly detection, security identification and risk scoring
//! over a normalized record set.
//!
//! Every stage is a pure function of the records. [`Analyzer`] holds the
//! compiled matchers so the stages can run concurrently from one shared
//! instance.

pub mod anomaly;
pub mod error;
pub mod model;
pub mod pattern;
pub mod risk;
pub mod security;
pub mod stats;
pub mod tally;

pub use error::AnalysisError;
pub use model::{
    AnalysisReport, Anomaly, Detections, Evidence, Finding, FindingKind, IpCount, PathCount, Pattern,
    RiskLevel, RiskSummary, SecurityIssue, Statistics, Thresholds,
};

use crate::advisory::Advisory;
use crate::filter::regex::{bot_user_agent, sensitive_assignment};
use crate::filter::{AttackSignatures, SignatureMatcher};
use crate::parser::LogRecord;

#[derive(Debug)]
pub struct Analyzer {
    thresholds: Thresholds,
    signatures: AttackSignatures,
    bot: SignatureMatcher,
    sensitive: SignatureMatcher,
}

impl Analyzer {
    pub fn new(thresholds: Thresholds) -> Result<Self, AnalysisError> {
        Ok(Self {
            thresholds,
            signatures: AttackSignatures::new()?,
            bot: bot_user_agent()?,
            sensitive: sensitive_assignment()?,
        })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn statistics(&self, records: &[LogRecord]) -> Statistics {
        stats::aggregate(records, &self.thresholds)
    }

    /// Anomalies (frequency, burst, signature) and patterns (bot, brute force).
    pub fn detect(&self, records: &[LogRecord]) -> Detections {
        Detections {
            anomalies: anomaly::detect(records, &self.thresholds, &self.signatures),
            patterns: pattern::identify(records, &self.thresholds, &self.bot),
        }
    }

    pub fn security_issues(&self, records: &[LogRecord]) -> Vec<SecurityIssue> {
        security::identify(records, &self.thresholds, &self.sensitive)
    }

    /// Combine independently computed stage outputs into the final report.
    pub fn assemble(
        &self,
        statistics: Option<Statistics>,
        detections: Detections,
        security_issues: Vec<SecurityIssue>,
        advisory: Option<&Advisory>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let summary = risk::summarize(
            statistics.as_ref(),
            &detections.anomalies,
            &security_issues,
            advisory,
        )?;
        let statistics = statistics.ok_or(AnalysisError::MissingInput("statistics"))?;

        Ok(AnalysisReport {
            summary,
            statistics,
            anomalies: detections.anomalies,
            patterns: detections.patterns,
            security_issues,
            recommendations: advisory
                .map(|a| a.recommendations.clone())
                .unwrap_or_default(),
        })
    }

    /// Run every stage sequentially on the calling thread.
    pub fn analyze(&self, records: &[LogRecord], advisory: Option<&Advisory>) -> Result<AnalysisReport, AnalysisError> {
        let statistics = self.statistics(records);
        let detections = self.detect(records);
        let issues = self.security_issues(records);
        self.assemble(Some(statistics), detections, issues, advisory)
    }
}
