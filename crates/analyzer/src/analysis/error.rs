use thiserror::Error;

use crate::filter::PatternError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required input was not supplied by the caller.
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Failed to build detector: {0}")]
    Pattern(#[from] PatternError),

    #[error("Analysis task failed: {0}")]
    Task(String),
}
