//! Error types shared across Halation crates.

use std::path::PathBuf;

/// Top-level error type for Halation operations.
#[derive(Debug, thiserror::Error)]
pub enum HalationError {
    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Probe error: {message}")]
    Probe { message: String },

    #[error("Job error: {message}")]
    Job { message: String },

    #[error("Invalid request: {message}")]
    Validation { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Job queue is full ({depth} pending)")]
    QueueFull { depth: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HalationError.
pub type HalationResult<T> = Result<T, HalationError>;

impl HalationError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe {
            message: msg.into(),
        }
    }

    pub fn job(msg: impl Into<String>) -> Self {
        Self::Job {
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }
}

impl From<halation_job_model::ValidationError> for HalationError {
    fn from(err: halation_job_model::ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}
