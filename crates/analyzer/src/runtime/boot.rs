//! Boot: logging init, config load, collaborator wiring, state creation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::advisory::FileAdvisor;
use crate::conf::AnalyzerConfig;
use crate::reputation::{BlocklistLookup, ReputationCache};
use crate::state::{AnalyzerState, SharedState};

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout carries only the report.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate config, then build shared state with whichever
/// collaborators are enabled.
///
/// Returns `(SharedState, AnalyzerConfig)` on success.
pub async fn boot() -> Result<(SharedState, AnalyzerConfig), Box<dyn std::error::Error>> {
    info!("Starting log analyzer v{}", env!("CARGO_PKG_VERSION"));

    let config = AnalyzerConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let state = build_state(config.clone()).await?;
    info!(
        advisory = state.advisor.is_some(),
        reputation = state.reputation.is_some(),
        "Initialized analyzer state"
    );

    Ok((Arc::new(state), config))
}

/// Build state from an already validated config.
pub async fn build_state(config: AnalyzerConfig) -> Result<AnalyzerState, Box<dyn std::error::Error>> {
    let mut state = AnalyzerState::new(config.clone())?;

    if config.advisory.enabled {
        info!("Advisory responses replayed from: {}", config.advisory.response_path);
        state = state.with_advisor(Arc::new(FileAdvisor::new(config.advisory.response_path.clone())));
    }

    if config.reputation.enabled {
        let blocklist = BlocklistLookup::load(Path::new(&config.reputation.blocklist_path)).await?;
        let ttl = Duration::from_secs(config.reputation.cache_ttl_secs);
        state = state.with_reputation(Arc::new(ReputationCache::new(Arc::new(blocklist), ttl)));
    }

    Ok(state)
}
