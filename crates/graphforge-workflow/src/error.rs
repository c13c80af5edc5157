//! Workflow error types
//!
//! Failures here are routine operational events (capacity shortages,
//! networks mid-boot), not programmer errors, so every stage reports a
//! typed outcome and the orchestrator alone decides what is retriable.

use graphforge_cloud::CloudError;
use graphforge_remote::RemoteError;
use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("server {address} never became reachable within {attempts} attempts")]
    Unreachable { address: Ipv4Addr, attempts: u32 },

    #[error("no region in zone {zone} had capacity")]
    NoCapacity { zone: String },

    #[error("snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("server {server} did not power off within budget")]
    ShutdownTimedOut { server: String },

    #[error("image {image} did not become available within budget")]
    ImageTimedOut { image: String },
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
