use serde::Serialize;
use thiserror::Error;

/// Scores above this are treated as malicious.
pub const MALICIOUS_THRESHOLD: f64 = 50.0;

#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("Reputation lookup failed for {ip}: {reason}")]
    Lookup { ip: String, reason: String },

    #[error("Reputation lookup timed out after {0}ms")]
    Timeout(u64),

    #[error("Reputation I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reputation {
    pub ip: String,
    /// 0 (clean) to 100
    pub risk_score: f64,
    pub is_malicious: bool,
    /// Names of the sources that contributed
    pub sources: Vec<String>,
}

impl Reputation {
    pub fn new(ip: impl Into<String>, risk_score: f64, sources: Vec<String>) -> Self {
        let risk_score = risk_score.clamp(0.0, 100.0);
        Self {
            ip: ip.into(),
            risk_score,
            is_malicious: risk_score > MALICIOUS_THRESHOLD,
            sources,
        }
    }

    pub fn clean(ip: impl Into<String>) -> Self {
        Self::new(ip, 0.0, Vec::new())
    }
}
