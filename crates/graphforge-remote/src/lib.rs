//! Remote execution transport
//!
//! Everything the workflows do on a server goes over SSH: a reachability
//! probe, shell scripts piped to `bash -s`, and file pushes via scp. The
//! [`RemoteRunner`] trait is the seam the orchestrator is tested through;
//! [`OpenSsh`] is the real implementation driving the system `ssh`/`scp`
//! binaries.

pub mod error;
pub mod probe;
pub mod runner;
pub mod target;

pub use error::{RemoteError, Result};
pub use probe::wait_reachable;
pub use runner::{OpenSsh, RemoteRunner};
pub use target::SshTarget;
