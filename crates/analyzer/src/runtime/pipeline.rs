//! Pipeline: concurrent batch analysis from files to a report bundle.
//!
//! Files are read asynchronously and parsed on the blocking pool, one task
//! per file, then joined in input order. The three analysis stages run as
//! independent blocking tasks over a shared snapshot of the records. The
//! collaborators are consulted last, each under its own timeout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::advisory::{consult, Advisory, AdvisoryRequest};
use crate::analysis::{AnalysisError, AnalysisReport, Statistics};
use crate::conf::AnalyzerConfig;
use crate::parser::{LogRecord, RawInput};
use crate::reputation::{check_batch_within, Reputation};
use crate::state::AnalyzerState;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Write(#[from] std::io::Error),
}

/// What the CLI emits: the report, the records for renderers, reputation
/// hits and the decoded advisory.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBundle {
    pub report: AnalysisReport,
    pub records: Vec<LogRecord>,
    pub suspicious_ips: Vec<Reputation>,
    pub advisory: Option<Advisory>,
}

/// Parse every file, keeping file order and line order within a file.
pub async fn parse_inputs(state: &AnalyzerState, paths: &[PathBuf]) -> Result<Vec<LogRecord>, PipelineError> {
    let mut tasks = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read(path).await.map_err(|source| PipelineError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let input = RawInput::from_path(path, content);
        let parser = Arc::clone(&state.parser);
        tasks.push(tokio::task::spawn_blocking(move || parser.parse_all(input)));
    }

    let mut records = Vec::new();
    for task in tasks {
        let parsed = task.await.map_err(|e| PipelineError::Task(e.to_string()))?;
        records.extend(parsed);
    }
    Ok(records)
}

/// Run the analysis stages concurrently, then the collaborators.
pub async fn analyze_records(state: &AnalyzerState, records: Vec<LogRecord>) -> Result<ReportBundle, PipelineError> {
    let records = Arc::new(records);

    let statistics = {
        let analyzer = Arc::clone(&state.analyzer);
        let records = Arc::clone(&records);
        tokio::task::spawn_blocking(move || analyzer.statistics(&records))
    };
    let detections = {
        let analyzer = Arc::clone(&state.analyzer);
        let records = Arc::clone(&records);
        tokio::task::spawn_blocking(move || analyzer.detect(&records))
    };
    let security_issues = {
        let analyzer = Arc::clone(&state.analyzer);
        let records = Arc::clone(&records);
        tokio::task::spawn_blocking(move || analyzer.security_issues(&records))
    };

    let (statistics, detections, security_issues) = tokio::try_join!(statistics, detections, security_issues)
        .map_err(|e| AnalysisError::Task(e.to_string()))?;
    debug!(
        anomalies = detections.anomalies.len(),
        patterns = detections.patterns.len(),
        security_issues = security_issues.len(),
        "Analysis stages complete"
    );

    let (advisory, suspicious_ips) = tokio::join!(
        advise(state, &records, &statistics),
        check_reputation(state, &records),
    );

    let report = state
        .analyzer
        .assemble(Some(statistics), detections, security_issues, advisory.as_ref())?;
    let records = Arc::try_unwrap(records).unwrap_or_else(|shared| shared.as_ref().clone());

    Ok(ReportBundle {
        report,
        records,
        suspicious_ips,
        advisory,
    })
}

/// Parse and analyze a batch of files.
pub async fn run(state: &AnalyzerState, paths: &[PathBuf]) -> Result<ReportBundle, PipelineError> {
    let records = parse_inputs(state, paths).await?;
    info!(files = paths.len(), records = records.len(), "Parsed batch");

    let bundle = analyze_records(state, records).await?;
    let metrics = state.metrics.snapshot();
    info!(
        recognized_rate = metrics.recognized_rate,
        risk_level = bundle.report.summary.risk_level.as_str(),
        "Analysis complete"
    );
    Ok(bundle)
}

/// Write the bundle as JSON to `output_path`, or stdout when unset.
pub async fn emit(bundle: &ReportBundle, config: &AnalyzerConfig) -> Result<(), PipelineError> {
    let json = encode(bundle, config.pretty)?;
    match &config.output_path {
        Some(path) => {
            tokio::fs::write(Path::new(path), json.as_bytes()).await?;
            info!("Report written to: {}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn encode(bundle: &ReportBundle, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(bundle)
    } else {
        serde_json::to_string(bundle)
    }
}

async fn advise(state: &AnalyzerState, records: &[LogRecord], statistics: &Statistics) -> Option<Advisory> {
    let advisor = state.advisor.as_ref()?;
    let cfg = &state.config.advisory;
    let request = AdvisoryRequest::from_records(records, statistics, cfg.sample_size, cfg.illustrative_size);
    consult(advisor.as_ref(), &request, Duration::from_millis(cfg.timeout_ms)).await
}

async fn check_reputation(state: &AnalyzerState, records: &[LogRecord]) -> Vec<Reputation> {
    let Some(lookup) = state.reputation.as_ref() else {
        return Vec::new();
    };
    let ips = state.ip_extractor.extract(records);
    let timeout = Duration::from_millis(state.config.reputation.timeout_ms);

    match check_batch_within(lookup.as_ref(), &ips, timeout).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(error = %e, ips = ips.len(), "Reputation checks skipped");
            Vec::new()
        }
    }
}
