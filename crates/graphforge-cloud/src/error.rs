//! Cloud provider error types

use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("no capacity in region {region}: {message}")]
    CapacityExhausted { region: String, message: String },

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether the orchestrator may retry the operation against another
    /// region. Only placement/capacity rejections qualify; everything else
    /// is fatal to the workflow.
    pub fn is_capacity(&self) -> bool {
        matches!(self, CloudError::CapacityExhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
