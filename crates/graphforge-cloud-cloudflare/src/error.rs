//! Cloudflare registrar error types

use graphforge_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudflareError {
    #[error("Cloudflare API error: {0}")]
    ApiError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CloudflareError> for CloudError {
    fn from(err: CloudflareError) -> Self {
        CloudError::ApiError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CloudflareError>;
