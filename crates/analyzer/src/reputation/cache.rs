use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::lookup::ReputationLookup;
use super::model::{Reputation, ReputationError};

#[derive(Debug, Clone)]
struct CachedReputation {
    reputation: Reputation,
    checked_at: Instant,
}

/// TTL cache in front of any [`ReputationLookup`].
///
/// Only successful lookups are cached. Concurrent misses for the same IP may
/// both reach the inner lookup; the later write wins.
pub struct ReputationCache {
    inner: Arc<dyn ReputationLookup>,
    entries: DashMap<String, CachedReputation>,
    ttl: Duration,
}

impl ReputationCache {
    pub fn new(inner: Arc<dyn ReputationLookup>, ttl: Duration) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fresh cached entry, if any.
    pub fn get(&self, ip: &str) -> Option<Reputation> {
        self.entries
            .get(ip)
            .filter(|entry| entry.checked_at.elapsed() < self.ttl)
            .map(|entry| entry.reputation.clone())
    }

    /// Drop expired entries.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.checked_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReputationLookup for ReputationCache {
    fn lookup<'a>(
        &'a self,
        ip: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Reputation, ReputationError>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(hit) = self.get(ip) {
                return Ok(hit);
            }

            let reputation = self.inner.lookup(ip).await?;
            self.purge_expired();
            self.entries.insert(
                ip.to_string(),
                CachedReputation {
                    reputation: reputation.clone(),
                    checked_at: Instant::now(),
                },
            );
            Ok(reputation)
        })
    }
}

impl std::fmt::Debug for ReputationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReputationCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
