//! Load: config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use super::model::{validate_thresholds, AdvisoryConfig, AnalyzerConfig, ReputationConfig, Thresholds};

impl AnalyzerConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("ANALYZER_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/logwarden/analyzer.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        // Environment variables override file config for paths
        if let Ok(output) = std::env::var("ANALYZER_OUTPUT") {
            config.output_path = Some(output);
        }
        if let Ok(response) = std::env::var("ANALYZER_ADVISORY_RESPONSE") {
            config.advisory.response_path = response;
        }
        if let Ok(blocklist) = std::env::var("ANALYZER_BLOCKLIST") {
            config.reputation.blocklist_path = blocklist;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AnalyzerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            output_path: std::env::var("ANALYZER_OUTPUT").ok(),
            pretty: env_or("ANALYZER_PRETTY", true),
            thresholds: Thresholds::from_env(),
            advisory: AdvisoryConfig::from_env(),
            reputation: ReputationConfig::from_env(),
        }
    }

    /// Validate thresholds, collaborator settings and referenced files
    pub fn validate(&self) -> Result<(), String> {
        validate_thresholds(&self.thresholds)?;
        self.advisory.validate()?;
        self.reputation.validate()?;

        if self.advisory.enabled {
            validate_file(&self.advisory.response_path, "Advisory response")?;
        }
        if self.reputation.enabled {
            validate_file(&self.reputation.blocklist_path, "Blocklist")?;
        }
        Ok(())
    }
}

fn validate_file(path: &str, name: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err(format!("{} path is not configured (empty string)", name));
    }
    if !Path::new(path).exists() {
        return Err(format!("{} not found at: {}", name, path));
    }
    Ok(())
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Thresholds {
    pub fn from_env() -> Self {
        let d = Thresholds::default();
        Self {
            top_n: env_or("ANALYZER_TOP_N", d.top_n),
            frequency_sigma: env_or("ANALYZER_FREQUENCY_SIGMA", d.frequency_sigma),
            burst_gate: env_or("ANALYZER_BURST_GATE", d.burst_gate),
            burst_size: env_or("ANALYZER_BURST_SIZE", d.burst_size),
            bot_top_n: env_or("ANALYZER_BOT_TOP_N", d.bot_top_n),
            brute_force_min: env_or("ANALYZER_BRUTE_FORCE_MIN", d.brute_force_min),
            server_error_ratio: env_or("ANALYZER_SERVER_ERROR_RATIO", d.server_error_ratio),
        }
    }
}

impl AdvisoryConfig {
    pub fn from_env() -> Self {
        let d = AdvisoryConfig::default();
        Self {
            enabled: env_or("ANALYZER_ADVISORY_ENABLED", d.enabled),
            response_path: std::env::var("ANALYZER_ADVISORY_RESPONSE").unwrap_or(d.response_path),
            timeout_ms: env_or("ANALYZER_ADVISORY_TIMEOUT_MS", d.timeout_ms),
            sample_size: env_or("ANALYZER_ADVISORY_SAMPLE_SIZE", d.sample_size),
            illustrative_size: env_or("ANALYZER_ADVISORY_ILLUSTRATIVE_SIZE", d.illustrative_size),
        }
    }
}

impl ReputationConfig {
    pub fn from_env() -> Self {
        let d = ReputationConfig::default();
        Self {
            enabled: env_or("ANALYZER_REPUTATION_ENABLED", d.enabled),
            blocklist_path: std::env::var("ANALYZER_BLOCKLIST").unwrap_or(d.blocklist_path),
            cache_ttl_secs: env_or("ANALYZER_REPUTATION_CACHE_TTL_SECS", d.cache_ttl_secs),
            timeout_ms: env_or("ANALYZER_REPUTATION_TIMEOUT_MS", d.timeout_ms),
        }
    }
}
