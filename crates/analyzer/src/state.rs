use std::sync::Arc;

use crate::advisory::Advisor;
use crate::analysis::Analyzer;
use crate::conf::AnalyzerConfig;
use crate::parser::{LogParser, ParsingMetrics};
use crate::reputation::{IpExtractor, ReputationLookup};

/// Everything a batch run needs, built once at boot and shared read-only.
pub struct AnalyzerState {
    pub config: AnalyzerConfig,
    pub parser: Arc<LogParser>,
    pub analyzer: Arc<Analyzer>,
    pub metrics: Arc<ParsingMetrics>,
    /// Absent when the advisory collaborator is disabled
    pub advisor: Option<Arc<dyn Advisor>>,
    /// Absent when reputation checks are disabled
    pub reputation: Option<Arc<dyn ReputationLookup>>,
    pub ip_extractor: IpExtractor,
}

impl AnalyzerState {
    pub fn new(config: AnalyzerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let metrics = Arc::new(ParsingMetrics::new());
        let parser = LogParser::with_metrics(Arc::clone(&metrics))?;
        let analyzer = Analyzer::new(config.thresholds.clone())?;

        Ok(Self {
            config,
            parser: Arc::new(parser),
            analyzer: Arc::new(analyzer),
            metrics,
            advisor: None,
            reputation: None,
            ip_extractor: IpExtractor::new()?,
        })
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_reputation(mut self, lookup: Arc<dyn ReputationLookup>) -> Self {
        self.reputation = Some(lookup);
        self
    }
}

pub type SharedState = Arc<AnalyzerState>;
