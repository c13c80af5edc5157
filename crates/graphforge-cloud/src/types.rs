//! Provider-independent domain types

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A cloud server owned by one workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Provider-assigned identifier
    pub id: String,

    /// Server name
    pub name: String,

    /// Public IPv4 address
    pub public_ip: Ipv4Addr,

    /// Region the server was placed in
    pub region: String,

    /// Power state at the time of the last observation
    pub status: PowerState,
}

/// Observed power state of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    Running,
    Off,
    /// Transient or unrecognized provider states (starting, migrating, ...)
    Unknown,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::Running => write!(f, "running"),
            PowerState::Off => write!(f, "off"),
            PowerState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Source image for a new server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Exact-match image name (e.g. "ubuntu-24.04" or a snapshot label)
    Name(String),
    /// Provider image id, as returned by a previous capture
    Id(String),
}

/// Everything needed to create one server. One spec maps to exactly one
/// provider API call; region fallback happens above this layer.
#[derive(Debug, Clone)]
pub struct ServerSpec {
    pub name: String,
    pub server_type: String,
    pub region: String,
    pub image: ImageRef,
    /// Name of an SSH key already registered with the provider
    pub ssh_key: String,
    /// Optional cloud-init payload executed on first boot
    pub user_data: Option<String>,
}

/// A snapshot image captured from a powered-off server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub description: String,
    pub status: ImageStatus,
}

/// Lifecycle state of a snapshot image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    Creating,
    Available,
    Unavailable,
}

/// A DNS A record pointing a hostname at an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Target IPv4 address, as the provider echoes it back
    pub content: String,
    pub proxied: bool,
}
