use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

use super::LogFormat;

/// A wrapper that forces the wrapped data onto its own cache line(s).
///
/// Keeps the per-dialect counters, which every record touches, away from the
/// rarely updated totals when several parse tasks run at once.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Records emitted per dialect
#[derive(Debug, Default)]
pub struct FormatMetrics {
    pub apache: AtomicU64,
    pub nginx: AtomicU64,
    pub syslog: AtomicU64,
    pub windows_event: AtomicU64,
    pub json: AtomicU64,
    pub csv: AtomicU64,
    pub xml: AtomicU64,
}

/// Units that could not be decoded and were downgraded
#[derive(Debug, Default)]
pub struct DowngradeMetrics {
    pub unknown: AtomicU64,
    pub json_error: AtomicU64,
    pub csv_error: AtomicU64,
    pub xml_error: AtomicU64,
    pub too_large: AtomicU64,
}

#[derive(Debug, Default)]
pub struct TotalMetrics {
    pub inputs: AtomicU64,
    pub records: AtomicU64,
    pub time_nanos: AtomicU64,
}

/// Counters shared by every parse task.
///
/// All operations use `Ordering::Relaxed`; `snapshot()` is not transactional
/// across fields.
#[derive(Debug, Default)]
pub struct ParsingMetrics {
    pub formats: CacheAligned<FormatMetrics>,
    pub downgrades: CacheAligned<DowngradeMetrics>,
    pub totals: CacheAligned<TotalMetrics>,
}

impl ParsingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hottest path: called once per emitted record.
    #[inline]
    pub fn record_emitted(&self, format: LogFormat) {
        self.totals.0.records.fetch_add(1, Ordering::Relaxed);

        let counter = match format {
            LogFormat::Apache => &self.formats.0.apache,
            LogFormat::Nginx => &self.formats.0.nginx,
            LogFormat::Syslog => &self.formats.0.syslog,
            LogFormat::WindowsEvent => &self.formats.0.windows_event,
            LogFormat::Json => &self.formats.0.json,
            LogFormat::Csv => &self.formats.0.csv,
            LogFormat::Xml => &self.formats.0.xml,
            LogFormat::Unknown => &self.downgrades.0.unknown,
            LogFormat::JsonError => &self.downgrades.0.json_error,
            LogFormat::CsvError => &self.downgrades.0.csv_error,
            LogFormat::XmlError => &self.downgrades.0.xml_error,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_too_large(&self) {
        self.downgrades.0.too_large.fetch_add(1, Ordering::Relaxed);
    }

    /// One finished input (file or payload) and the time spent on it.
    pub fn record_input(&self, time_nanos: u64) {
        self.totals.0.inputs.fetch_add(1, Ordering::Relaxed);
        self.totals.0.time_nanos.fetch_add(time_nanos, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let f = &self.formats.0;
        let d = &self.downgrades.0;
        let t = &self.totals.0;

        let total_records = t.records.load(Ordering::Relaxed);
        let unknown = d.unknown.load(Ordering::Relaxed);
        let json_error = d.json_error.load(Ordering::Relaxed);
        let csv_error = d.csv_error.load(Ordering::Relaxed);
        let xml_error = d.xml_error.load(Ordering::Relaxed);
        let downgraded = unknown + json_error + csv_error + xml_error;
        let inputs = t.inputs.load(Ordering::Relaxed);
        let time_nanos = t.time_nanos.load(Ordering::Relaxed);

        MetricsSnapshot {
            apache: f.apache.load(Ordering::Relaxed),
            nginx: f.nginx.load(Ordering::Relaxed),
            syslog: f.syslog.load(Ordering::Relaxed),
            windows_event: f.windows_event.load(Ordering::Relaxed),
            json: f.json.load(Ordering::Relaxed),
            csv: f.csv.load(Ordering::Relaxed),
            xml: f.xml.load(Ordering::Relaxed),

            unknown,
            json_error,
            csv_error,
            xml_error,
            lines_too_large: d.too_large.load(Ordering::Relaxed),

            inputs,
            total_records,
            avg_input_time_us: if inputs > 0 {
                (time_nanos as f64 / inputs as f64) / 1000.0
            } else {
                0.0
            },
            recognized_rate: if total_records > 0 {
                (total_records - downgraded.min(total_records)) as f64 / total_records as f64
            } else {
                1.0
            },
        }
    }
}

/// Read-only copy of [`ParsingMetrics`], logged after each batch.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub apache: u64,
    pub nginx: u64,
    pub syslog: u64,
    pub windows_event: u64,
    pub json: u64,
    pub csv: u64,
    pub xml: u64,

    pub unknown: u64,
    pub json_error: u64,
    pub csv_error: u64,
    pub xml_error: u64,
    pub lines_too_large: u64,

    pub inputs: u64,
    pub total_records: u64,
    pub avg_input_time_us: f64,
    /// Share of records that were not downgraded
    pub recognized_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_empty() {
        let snap = ParsingMetrics::new().snapshot();
        assert_eq!(snap.total_records, 0);
        assert_eq!(snap.inputs, 0);
        assert_eq!(snap.avg_input_time_us, 0.0);
        assert_eq!(snap.recognized_rate, 1.0);
    }

    #[test]
    fn test_record_emitted_by_dialect() {
        let metrics = ParsingMetrics::new();
        metrics.record_emitted(LogFormat::Apache);
        metrics.record_emitted(LogFormat::Apache);
        metrics.record_emitted(LogFormat::Syslog);
        metrics.record_emitted(LogFormat::Unknown);

        let snap = metrics.snapshot();
        assert_eq!(snap.apache, 2);
        assert_eq!(snap.syslog, 1);
        assert_eq!(snap.unknown, 1);
        assert_eq!(snap.total_records, 4);
        assert_eq!(snap.recognized_rate, 0.75);
    }

    #[test]
    fn test_downgrades_and_oversized() {
        let metrics = ParsingMetrics::new();
        metrics.record_emitted(LogFormat::JsonError);
        metrics.record_emitted(LogFormat::CsvError);
        metrics.record_emitted(LogFormat::XmlError);
        metrics.record_too_large();

        let snap = metrics.snapshot();
        assert_eq!(snap.json_error, 1);
        assert_eq!(snap.csv_error, 1);
        assert_eq!(snap.xml_error, 1);
        assert_eq!(snap.lines_too_large, 1);
        assert_eq!(snap.recognized_rate, 0.0);
    }

    #[test]
    fn test_input_timing() {
        let metrics = ParsingMetrics::new();
        metrics.record_input(1000);
        metrics.record_input(2000);

        let snap = metrics.snapshot();
        assert_eq!(snap.inputs, 2);
        assert!((snap.avg_input_time_us - 1.5).abs() < f64::EPSILON);
    }
}
