//! Graphforge cloud abstraction
//!
//! This crate defines the provider-independent surface the provisioning
//! workflows are written against:
//!
//! - [`ComputeProvider`]: create/inspect/power/delete servers and capture
//!   snapshot images. Implemented by `graphforge-cloud-hetzner`.
//! - [`DnsRegistrar`]: create an A record for a freshly minted hostname.
//!   Implemented by `graphforge-cloud-cloudflare`.
//! - [`retry::poll_until`]: the bounded fixed-interval polling combinator
//!   every wait loop in the workflow goes through.
//! - [`location`]: zone-to-region resolution with ordered fallbacks.

pub mod error;
pub mod location;
pub mod provider;
pub mod retry;
pub mod types;

pub use error::{CloudError, Result};
pub use location::RegionPlan;
pub use provider::{ComputeProvider, DnsRegistrar};
pub use retry::{Poll, PollConfig};
pub use types::{DnsRecord, Image, ImageRef, ImageStatus, Instance, PowerState, ServerSpec};
