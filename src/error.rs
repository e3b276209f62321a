//! Error handling for the resume matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not extract text from file: {0}")]
    EmptyDocument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, ResumeMatcherError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeMatcherError {
    fn from(err: anyhow::Error) -> Self {
        ResumeMatcherError::Processing(err.to_string())
    }
}

impl ResumeMatcherError {
    /// True for failures that end an analysis before any result exists
    pub fn is_fatal_analysis_error(&self) -> bool {
        matches!(
            self,
            ResumeMatcherError::UnsupportedFormat(_) | ResumeMatcherError::EmptyDocument(_)
        )
    }
}
