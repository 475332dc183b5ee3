//! Provisioning error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },

    #[error("upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("stage '{stage}' was cancelled")]
    Cancelled { stage: String },

    #[error("stage '{stage}' timed out after {seconds}s")]
    Timeout { stage: String, seconds: u64 },

    #[error("duplicate stage name: {0}")]
    DuplicateStage(String),

    #[error("stage '{stage}' depends on unknown stage '{dependency}'")]
    UnknownDependency { stage: String, dependency: String },

    #[error("dependency cycle among stages: {0}")]
    DependencyCycle(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("provider error: {0}")]
    Host(String),

    #[error("state file error: {0}")]
    StateError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
