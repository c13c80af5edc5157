//! Hetzner Cloud provider
//!
//! Talks to the Hetzner Cloud REST API (`https://api.hetzner.cloud/v1`)
//! with bearer-token authentication and implements the
//! [`ComputeProvider`](graphforge_cloud::ComputeProvider) trait on top of
//! it.

pub mod api;
pub mod error;
pub mod provider;

pub use api::HetznerApi;
pub use error::{HetznerError, Result};
pub use provider::HetznerProvider;
