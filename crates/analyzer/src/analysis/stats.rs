//! Statistics Aggregator.

use super::model::{IpCount, PathCount, Statistics, Thresholds};
use super::tally::Tally;
use crate::parser::{LogRecord, Severity};

/// Single pass over `records`. Empty input yields zero counts and an error
/// rate of 0.
pub fn aggregate(records: &[LogRecord], thresholds: &Thresholds) -> Statistics {
    let mut severities: Tally<Severity> = Tally::new();
    let mut statuses: Tally<&str> = Tally::new();
    let mut ips: Tally<&str> = Tally::new();
    let mut paths: Tally<&str> = Tally::new();
    let mut errors = 0usize;

    for record in records {
        severities.add(record.severity);
        if record.severity.is_error() {
            errors += 1;
        }
        if let Some(status) = non_empty(&record.status) {
            statuses.add(status);
        }
        if let Some(ip) = non_empty(&record.ip) {
            ips.add(ip);
        }
        if let Some(path) = non_empty(&record.path) {
            paths.add(path);
        }
    }

    let n = thresholds.top_n;
    Statistics {
        total_logs: records.len(),
        unique_ips: ips.len(),
        severity_distribution: severities.entries().to_vec(),
        status_codes: statuses
            .top(n)
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect(),
        top_ips: ips
            .top(n)
            .into_iter()
            .map(|(ip, count)| IpCount { ip: ip.to_string(), count })
            .collect(),
        top_paths: paths
            .top(n)
            .into_iter()
            .map(|(path, count)| PathCount { path: path.to_string(), count })
            .collect(),
        error_rate: percentage(errors, records.len()),
    }
}

/// `part / total * 100`, 0 for an empty total.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
