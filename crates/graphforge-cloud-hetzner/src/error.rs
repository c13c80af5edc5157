//! Hetzner provider error types

use graphforge_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HetznerError {
    #[error("Hetzner API error [{code}]: {message}")]
    Api { code: String, message: String },

    #[error("no capacity in region {region}: {message}")]
    NoCapacity { region: String, message: String },

    #[error("SSH key not registered with the provider: {0}")]
    SshKeyNotFound(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<HetznerError> for CloudError {
    fn from(err: HetznerError) -> Self {
        match err {
            HetznerError::NoCapacity { region, message } => {
                CloudError::CapacityExhausted { region, message }
            }
            HetznerError::SshKeyNotFound(name) => CloudError::ResourceNotFound(name),
            HetznerError::UnexpectedResponse(msg) => CloudError::InvalidResponse(msg),
            other => CloudError::ApiError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, HetznerError>;
