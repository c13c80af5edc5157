//! Cloudflare DNS registrar
//!
//! Creates the A record that binds a generated instance hostname to a
//! server's public address, via the Cloudflare v4 API with bearer-token
//! authentication. Records are write-once: provisioning mints a fresh
//! random fqdn every time, so there is no update or delete path here.

pub mod dns;
pub mod error;

pub use dns::{CloudflareDns, DnsConfig};
pub use error::{CloudflareError, Result};
