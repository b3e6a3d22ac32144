//! Fake: test double for the advisory collaborator.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::client::Advisor;
use super::model::{AdvisoryError, AdvisoryRequest};

/// Canned advisor: answers with a fixed text or a fixed failure, optionally
/// after a delay, and counts calls.
pub struct FakeAdvisor {
    response: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeAdvisor {
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Advisor for FakeAdvisor {
    fn advise<'a>(
        &'a self,
        _request: &'a AdvisoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, AdvisoryError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone().map_err(AdvisoryError::Unavailable)
        })
    }
}
