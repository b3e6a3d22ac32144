//! Anomaly Detector: frequency outliers, error bursts and attack signatures.
//!
//! Sub-detectors are independent and deterministic; `detect` concatenates
//! their output in a fixed order.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use tracing::debug;

use super::model::{Anomaly, Evidence, Finding, FindingKind, RiskLevel, Thresholds};
use super::stats::non_empty;
use super::tally::Tally;
use crate::filter::AttackSignatures;
use crate::parser::normalize::parse_timestamp;
use crate::parser::LogRecord;

/// Frequency, burst, then signature findings.
pub fn detect(records: &[LogRecord], thresholds: &Thresholds, signatures: &AttackSignatures) -> Vec<Anomaly> {
    let mut anomalies = frequency_outliers(records, thresholds);
    anomalies.extend(error_bursts(records, thresholds));
    anomalies.extend(attack_signatures(records, signatures));
    anomalies
}

/// IPs whose request count exceeds `mean + sigma * stddev` of the per-IP
/// counts (population standard deviation).
pub fn frequency_outliers(records: &[LogRecord], thresholds: &Thresholds) -> Vec<Anomaly> {
    let counts: Tally<&str> = records.iter().filter_map(|r| non_empty(&r.ip)).collect();
    if counts.is_empty() {
        return Vec::new();
    }

    let n = counts.len() as f64;
    let mean = counts.entries().iter().map(|(_, c)| *c as f64).sum::<f64>() / n;
    let variance = counts
        .entries()
        .iter()
        .map(|(_, c)| (*c as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let threshold = mean + thresholds.frequency_sigma * variance.sqrt();
    debug!(distinct_ips = counts.len(), mean, threshold, "Frequency threshold");

    counts
        .entries()
        .iter()
        .filter(|(_, count)| *count as f64 > threshold)
        .map(|(ip, count)| {
            Finding::new(
                FindingKind::HighFrequencyIp,
                RiskLevel::High,
                format!("IP {} has unusually high activity ({} requests)", ip, count),
            )
            .with_evidence(Evidence::Ip {
                ip: ip.to_string(),
                count: *count,
            })
        })
        .collect()
}

/// Minute buckets holding more than `burst_size` ERROR/CRITICAL records.
///
/// Runs only when the error set is larger than `burst_gate`. Records whose
/// timestamp does not parse are left out of bucketing.
pub fn error_bursts(records: &[LogRecord], thresholds: &Thresholds) -> Vec<Anomaly> {
    let errors: Vec<&LogRecord> = records.iter().filter(|r| r.severity.is_error()).collect();
    if errors.len() <= thresholds.burst_gate {
        return Vec::new();
    }

    let windows: Tally<DateTime<Utc>> = errors
        .iter()
        .filter_map(|r| r.timestamp.as_deref())
        .filter_map(parse_timestamp)
        .filter_map(minute_floor)
        .collect();

    windows
        .entries()
        .iter()
        .filter(|(_, count)| *count > thresholds.burst_size)
        .map(|(window, count)| {
            Finding::new(
                FindingKind::ErrorBurst,
                RiskLevel::High,
                format!("Error burst detected: {} errors in one minute", count),
            )
            .with_evidence(Evidence::Window {
                timestamp: window.to_rfc3339_opts(SecondsFormat::Secs, true),
                count: *count,
            })
        })
        .collect()
}

fn minute_floor(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    ts.with_second(0)?.with_nanosecond(0)
}

/// Test `"{path} {message}"` of every record against each signature family.
/// One record can yield several findings.
pub fn attack_signatures(records: &[LogRecord], signatures: &AttackSignatures) -> Vec<Anomaly> {
    let families = [
        (
            &signatures.sql_injection,
            FindingKind::SqlInjectionAttempt,
            RiskLevel::Critical,
            "Potential SQL injection attempt detected",
        ),
        (
            &signatures.xss,
            FindingKind::XssAttempt,
            RiskLevel::High,
            "Potential XSS attack attempt detected",
        ),
        (
            &signatures.path_traversal,
            FindingKind::PathTraversalAttempt,
            RiskLevel::High,
            "Potential path traversal attempt detected",
        ),
    ];

    let mut anomalies = Vec::new();
    for record in records {
        let combined = format!(
            "{} {}",
            record.path.as_deref().unwrap_or_default(),
            record.message.as_deref().unwrap_or_default()
        );
        for (matcher, kind, severity, description) in &families {
            if matcher.is_match_str(&combined) {
                anomalies.push(
                    Finding::new(*kind, *severity, *description)
                        .with_evidence(Evidence::Record { details: record.clone() }),
                );
            }
        }
    }
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{LogFormat, Severity};

    fn with_ip(ip: &str) -> LogRecord {
        let mut r = LogRecord::new(format!("{} GET /", ip), LogFormat::Apache);
        r.ip = Some(ip.to_string());
        r
    }

    fn error_at(ts: &str) -> LogRecord {
        let mut r = LogRecord::new("boom", LogFormat::Json);
        r.timestamp = Some(ts.to_string());
        r.severity = Severity::Error;
        r
    }

    fn with_path(path: &str) -> LogRecord {
        let mut r = LogRecord::new(path, LogFormat::Apache);
        r.path = Some(path.to_string());
        r
    }

    fn signatures() -> AttackSignatures {
        AttackSignatures::new().unwrap()
    }

    // ── Frequency ──────────────────────────────────────────────

    #[test]
    fn test_frequency_95_of_100_across_6_ips_is_not_an_outlier() {
        // mean = 16.67, population stddev = 35.03, threshold = 121.8 > 95
        let mut records: Vec<LogRecord> = (0..95).map(|_| with_ip("10.0.0.1")).collect();
        records.extend((2..7).map(|i| with_ip(&format!("10.0.0.{}", i))));
        assert!(frequency_outliers(&records, &Thresholds::default()).is_empty());
    }

    #[test]
    fn test_frequency_dominant_ip_among_many_is_reported() {
        // 21 distinct IPs: mean = 5.48, stddev = 20.02, threshold = 65.5
        let mut records: Vec<LogRecord> = (0..95).map(|_| with_ip("10.0.0.1")).collect();
        records.extend((2..22).map(|i| with_ip(&format!("10.0.0.{}", i))));

        let anomalies = frequency_outliers(&records, &Thresholds::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, FindingKind::HighFrequencyIp);
        assert_eq!(anomalies[0].severity, RiskLevel::High);
        assert_eq!(
            anomalies[0].evidence,
            Some(Evidence::Ip { ip: "10.0.0.1".into(), count: 95 })
        );
    }

    #[test]
    fn test_frequency_degenerate_inputs() {
        assert!(frequency_outliers(&[], &Thresholds::default()).is_empty());

        // One IP: stddev is 0 and the count equals the mean.
        let single: Vec<LogRecord> = (0..50).map(|_| with_ip("1.1.1.1")).collect();
        assert!(frequency_outliers(&single, &Thresholds::default()).is_empty());

        let no_ips = vec![LogRecord::new("x", LogFormat::Unknown)];
        assert!(frequency_outliers(&no_ips, &Thresholds::default()).is_empty());
    }

    #[test]
    fn test_frequency_sigma_is_tunable() {
        let mut records: Vec<LogRecord> = (0..95).map(|_| with_ip("10.0.0.1")).collect();
        records.extend((2..7).map(|i| with_ip(&format!("10.0.0.{}", i))));
        let thresholds = Thresholds { frequency_sigma: 2.0, ..Thresholds::default() };
        assert_eq!(frequency_outliers(&records, &thresholds).len(), 1);
    }

    // ── Bursts ─────────────────────────────────────────────────

    #[test]
    fn test_burst_reported_per_minute_bucket() {
        let mut records: Vec<LogRecord> = (0..6)
            .map(|s| error_at(&format!("2026-01-01T10:15:{:02}Z", s * 7)))
            .collect();
        records.extend((0..5).map(|s| error_at(&format!("2026-01-01T10:16:{:02}", s))));

        let bursts = error_bursts(&records, &Thresholds::default());
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].kind, FindingKind::ErrorBurst);
        assert_eq!(
            bursts[0].evidence,
            Some(Evidence::Window { timestamp: "2026-01-01T10:15:00Z".into(), count: 6 })
        );
    }

    #[test]
    fn test_burst_gate_requires_more_than_ten_errors() {
        let records: Vec<LogRecord> = (0..10)
            .map(|s| error_at(&format!("2026-01-01T10:15:{:02}Z", s)))
            .collect();
        assert!(error_bursts(&records, &Thresholds::default()).is_empty());
    }

    #[test]
    fn test_burst_skips_unparseable_timestamps() {
        let mut records: Vec<LogRecord> = (0..6)
            .map(|_| error_at("Oct 11 22:14:15"))
            .collect();
        records.extend((0..5).map(|s| error_at(&format!("2026-01-01 10:15:{:02}", s))));
        records.push(LogRecord::new("info", LogFormat::Json));

        // 11 errors pass the gate; only 5 have usable timestamps.
        assert!(error_bursts(&records, &Thresholds::default()).is_empty());
    }

    #[test]
    fn test_burst_counts_critical() {
        let records: Vec<LogRecord> = (0..11)
            .map(|s| {
                let mut r = error_at(&format!("10/Oct/2023:13:55:{:02} +0000", s));
                r.severity = Severity::Critical;
                r
            })
            .collect();
        let bursts = error_bursts(&records, &Thresholds::default());
        assert_eq!(bursts.len(), 1);
        assert_eq!(
            bursts[0].evidence,
            Some(Evidence::Window { timestamp: "2023-10-10T13:55:00Z".into(), count: 11 })
        );
    }

    // ── Signatures ─────────────────────────────────────────────

    #[test]
    fn test_sql_injection_scenario() {
        let records = vec![with_path("/x?id=1 UNION SELECT password")];
        let anomalies = attack_signatures(&records, &signatures());

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, FindingKind::SqlInjectionAttempt);
        assert_eq!(anomalies[0].severity, RiskLevel::Critical);
        assert_eq!(
            anomalies[0].evidence,
            Some(Evidence::Record { details: records[0].clone() })
        );
    }

    #[test]
    fn test_one_record_can_match_several_families() {
        let records = vec![with_path("/../../etc?q=<script>alert(1)</script>")];
        let kinds: Vec<FindingKind> = attack_signatures(&records, &signatures())
            .into_iter()
            .map(|a| a.kind)
            .collect();
        assert_eq!(kinds, vec![FindingKind::XssAttempt, FindingKind::PathTraversalAttempt]);
    }

    #[test]
    fn test_message_is_scanned_too() {
        let mut record = LogRecord::new("m", LogFormat::Syslog);
        record.message = Some("drop table users".into());
        assert_eq!(attack_signatures(&[record], &signatures()).len(), 1);
    }

    #[test]
    fn test_clean_records_yield_nothing() {
        let records = vec![with_path("/index.html"), LogRecord::new("x", LogFormat::Unknown)];
        assert!(attack_signatures(&records, &signatures()).is_empty());
    }

    #[test]
    fn test_detect_is_ordered_and_deterministic() {
        let mut records: Vec<LogRecord> = (0..95).map(|_| with_ip("10.0.0.1")).collect();
        records.extend((2..22).map(|i| with_ip(&format!("10.0.0.{}", i))));
        records.push(with_path("/a?q=1 union select 1"));

        let sigs = signatures();
        let first = detect(&records, &Thresholds::default(), &sigs);
        let second = detect(&records, &Thresholds::default(), &sigs);
        assert_eq!(first, second);

        let kinds: Vec<FindingKind> = first.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![FindingKind::HighFrequencyIp, FindingKind::SqlInjectionAttempt]);
    }
}
