//! Connection target

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// Remote service identity used after bootstrap has created it
pub const SERVICE_USER: &str = "neo4j_admin";

/// One authenticated destination: address, login identity, key file.
/// Targets are cheap values; a new session is established per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: Ipv4Addr,
    pub user: String,
    pub key_path: PathBuf,
}

impl SshTarget {
    /// Privileged identity used for initial bootstrap
    pub fn root(host: Ipv4Addr, key_path: impl Into<PathBuf>) -> Self {
        Self {
            host,
            user: "root".to_string(),
            key_path: key_path.into(),
        }
    }

    /// Unprivileged service identity used after bootstrap
    pub fn service(host: Ipv4Addr, key_path: impl Into<PathBuf>) -> Self {
        Self {
            host,
            user: SERVICE_USER.to_string(),
            key_path: key_path.into(),
        }
    }

    /// `user@host` destination string for ssh/scp
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }
}
