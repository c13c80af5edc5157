//! Provider trait definitions

use crate::error::Result;
use crate::types::{DnsRecord, Image, ImageStatus, Instance, PowerState, ServerSpec};
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Compute provider abstraction
///
/// The workflow engine talks to the cloud exclusively through this trait so
/// that flows can be exercised against scripted fakes in tests.
///
/// Contract notes:
/// - `create_server` performs exactly one API call and never retries.
///   A capacity rejection surfaces as [`CloudError::CapacityExhausted`]
///   (see [`CloudError::is_capacity`]) and the orchestrator decides whether
///   a fallback region gets a fresh call.
/// - `power_off` only issues the request; callers poll `server_status`
///   until the server reports [`PowerState::Off`].
///
/// [`CloudError::CapacityExhausted`]: crate::error::CloudError::CapacityExhausted
/// [`CloudError::is_capacity`]: crate::error::CloudError::is_capacity
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Provider name for logs (e.g. "hetzner-cloud")
    fn name(&self) -> &str;

    /// Create a server. One call, no internal retry.
    async fn create_server(&self, spec: &ServerSpec) -> Result<Instance>;

    /// Current power state of a server
    async fn server_status(&self, id: &str) -> Result<PowerState>;

    /// Request a power-off. Returns once the provider accepts the action.
    async fn power_off(&self, id: &str) -> Result<()>;

    /// Delete a server and its attached disks
    async fn delete_server(&self, id: &str) -> Result<()>;

    /// Request a snapshot image from an (already powered-off) server
    async fn create_image(&self, server_id: &str, description: &str) -> Result<Image>;

    /// Current lifecycle state of an image
    async fn image_status(&self, id: &str) -> Result<ImageStatus>;

    /// Look up an image by exact description/name match
    async fn find_image_by_name(&self, name: &str) -> Result<Option<Image>>;
}

/// DNS registrar abstraction
///
/// A single operation: point a freshly generated fqdn at an address.
/// Records are never updated or deleted by the workflows; re-provisioning
/// mints a new fqdn instead of reusing one, so duplicate-name calls are
/// allowed to succeed on the provider side.
#[async_trait]
pub trait DnsRegistrar: Send + Sync {
    /// Mint a fresh, never-before-used fqdn for a new instance
    fn mint_fqdn(&self) -> String;

    async fn create_record(&self, fqdn: &str, ip: Ipv4Addr, proxied: bool) -> Result<DnsRecord>;
}
