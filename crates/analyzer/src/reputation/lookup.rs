//! ReputationLookup trait and the local blocklist implementation.

use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tracing::info;

use super::model::{Reputation, ReputationError};

/// Object-safe async reputation source.
pub trait ReputationLookup: Send + Sync {
    fn lookup<'a>(
        &'a self,
        ip: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Reputation, ReputationError>> + Send + 'a>>;
}

/// Score assigned to an IP found on a blocklist.
pub const BLOCKLIST_SCORE: f64 = 75.0;

/// Checks IPs against a set loaded from a blocklist file.
///
/// One entry per line; the first whitespace-separated token is the IP, so
/// `ip count` style lists load as-is. Blank lines and `#` comments are skipped.
#[derive(Debug, Clone, Default)]
pub struct BlocklistLookup {
    name: String,
    entries: HashSet<String>,
}

impl BlocklistLookup {
    pub fn from_entries<I, S>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(name: impl Into<String>, content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string);
        Self::from_entries(name, entries)
    }

    pub async fn load(path: &Path) -> Result<Self, ReputationError> {
        let content = tokio::fs::read_to_string(path).await?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "blocklist".to_string());
        let lookup = Self::parse(name, &content);
        info!(path = %path.display(), entries = lookup.len(), "Loaded blocklist");
        Ok(lookup)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReputationLookup for BlocklistLookup {
    fn lookup<'a>(
        &'a self,
        ip: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Reputation, ReputationError>> + Send + 'a>> {
        Box::pin(async move {
            if self.entries.contains(ip) {
                Ok(Reputation::new(ip, BLOCKLIST_SCORE, vec![self.name.clone()]))
            } else {
                Ok(Reputation::clean(ip))
            }
        })
    }
}
