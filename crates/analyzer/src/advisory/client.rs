//! Advisor trait: abstract interface for the advisory collaborator.
//!
//! The pipeline only sees `dyn Advisor`. `FileAdvisor` replays a stored
//! response; tests use `fake::FakeAdvisor`.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

use super::model::{Advisory, AdvisoryError, AdvisoryRequest};

/// Object-safe async advisory collaborator. Returns the raw response text.
pub trait Advisor: Send + Sync {
    fn advise<'a>(
        &'a self,
        request: &'a AdvisoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AdvisoryError>> + Send + 'a>>;
}

/// Offline collaborator that answers every request with a stored response.
#[derive(Debug, Clone)]
pub struct FileAdvisor {
    path: PathBuf,
}

impl FileAdvisor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Advisor for FileAdvisor {
    fn advise<'a>(
        &'a self,
        _request: &'a AdvisoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AdvisoryError>> + Send + 'a>> {
        Box::pin(async move {
            let text = tokio::fs::read_to_string(&self.path).await?;
            Ok(text)
        })
    }
}

/// Ask the collaborator, bounded by `timeout`.
///
/// Failure or timeout yields `None`; a malformed answer yields the empty advisory.
pub async fn consult(advisor: &dyn Advisor, request: &AdvisoryRequest, timeout: Duration) -> Option<Advisory> {
    let result = match tokio::time::timeout(timeout, advisor.advise(request)).await {
        Ok(result) => result,
        Err(_) => Err(AdvisoryError::Timeout(timeout.as_millis() as u64)),
    };

    match result {
        Ok(text) => {
            let advisory = Advisory::from_response(&text);
            if advisory.is_empty() {
                debug!(bytes = text.len(), "Advisory response had no usable content");
            }
            Some(advisory)
        }
        Err(e) => {
            warn!(error = %e, "Advisory unavailable, continuing without it");
            None
        }
    }
}
