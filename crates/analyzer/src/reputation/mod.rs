//! IP-reputation collaborator boundary.
//!
//! Lookups are reached only through [`ReputationLookup`]; caching is a
//! wrapper around a lookup, never global state.

pub mod cache;
pub mod extract;
pub mod lookup;
pub mod model;

use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

pub use cache::ReputationCache;
pub use extract::IpExtractor;
pub use lookup::{BlocklistLookup, ReputationLookup, BLOCKLIST_SCORE};
pub use model::{Reputation, ReputationError, MALICIOUS_THRESHOLD};

/// Look up every IP concurrently. Failed lookups are skipped; only IPs
/// with a non-zero score are returned, in input order.
pub async fn check_batch(lookup: &dyn ReputationLookup, ips: &[String]) -> Vec<Reputation> {
    let results = join_all(
        ips.iter()
            .filter(|ip| !ip.is_empty())
            .map(|ip| lookup.lookup(ip)),
    )
    .await;

    let mut hits = Vec::new();
    for result in results {
        match result {
            Ok(reputation) if reputation.risk_score > 0.0 => hits.push(reputation),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Reputation lookup failed"),
        }
    }
    debug!(checked = ips.len(), flagged = hits.len(), "Reputation batch complete");
    hits
}

/// [`check_batch`] bounded by `timeout`.
pub async fn check_batch_within(
    lookup: &dyn ReputationLookup,
    ips: &[String],
    timeout: Duration,
) -> Result<Vec<Reputation>, ReputationError> {
    tokio::time::timeout(timeout, check_batch(lookup, ips))
        .await
        .map_err(|_| ReputationError::Timeout(timeout.as_millis() as u64))
}
