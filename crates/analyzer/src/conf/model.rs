//! Model: AnalyzerConfig and related structs.

use serde::{Deserialize, Serialize};

pub use crate::analysis::Thresholds;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Write the report bundle here instead of stdout
    pub output_path: Option<String>,
    pub pretty: bool,
    pub thresholds: Thresholds,
    pub advisory: AdvisoryConfig,
    pub reputation: ReputationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    /// Stored collaborator response replayed by the file advisor
    pub response_path: String,
    pub timeout_ms: u64,
    pub sample_size: usize,
    pub illustrative_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    pub enabled: bool,
    pub blocklist_path: String,
    pub cache_ttl_secs: u64,
    pub timeout_ms: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            output_path: None,
            pretty: true,
            thresholds: Thresholds::default(),
            advisory: AdvisoryConfig::default(),
            reputation: ReputationConfig::default(),
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            response_path: "".to_string(),
            timeout_ms: 30_000,
            sample_size: 100,
            illustrative_size: 10,
        }
    }
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            blocklist_path: "/etc/logwarden/blocklist.txt".to_string(),
            cache_ttl_secs: 86_400,
            timeout_ms: 10_000,
        }
    }
}

impl AdvisoryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.timeout_ms == 0 {
            return Err("advisory.timeout_ms must be > 0 when advisory is enabled".to_string());
        }
        if self.sample_size == 0 {
            return Err("advisory.sample_size must be > 0 when advisory is enabled".to_string());
        }
        if self.illustrative_size > self.sample_size {
            return Err("advisory.illustrative_size must not exceed advisory.sample_size".to_string());
        }
        Ok(())
    }
}

impl ReputationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.cache_ttl_secs == 0 {
            return Err("reputation.cache_ttl_secs must be > 0 when reputation is enabled".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("reputation.timeout_ms must be > 0 when reputation is enabled".to_string());
        }
        Ok(())
    }
}

pub(crate) fn validate_thresholds(t: &Thresholds) -> Result<(), String> {
    if t.top_n == 0 {
        return Err("thresholds.top_n must be > 0".to_string());
    }
    if t.bot_top_n == 0 {
        return Err("thresholds.bot_top_n must be > 0".to_string());
    }
    if !t.frequency_sigma.is_finite() || t.frequency_sigma <= 0.0 {
        return Err("thresholds.frequency_sigma must be a positive number".to_string());
    }
    if !(t.server_error_ratio > 0.0 && t.server_error_ratio <= 1.0) {
        return Err("thresholds.server_error_ratio must be in (0, 1]".to_string());
    }
    Ok(())
}
