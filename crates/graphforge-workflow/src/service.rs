//! Service lifecycle control
//!
//! Drives the containerized database on a remote instance. The golden-image
//! flow starts the service once so it lays down its persistent first-run
//! state, waits a fixed settle time, then stops it again: the database must
//! not be running when the disk is frozen into a snapshot. Client instances
//! get a plain cold start and stay up.

use crate::scripts;
use graphforge_remote::{RemoteRunner, SshTarget};
use std::time::Duration;

/// Fixed settle time after a first start, long enough for the database to
/// complete its first-run initialization.
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(120);

pub struct ServiceController<'a> {
    runner: &'a dyn RemoteRunner,
}

impl<'a> ServiceController<'a> {
    pub fn new(runner: &'a dyn RemoteRunner) -> Self {
        Self { runner }
    }

    pub async fn start(&self, target: &SshTarget) -> graphforge_remote::Result<()> {
        self.runner
            .run_script(target, &scripts::start_service())
            .await
    }

    pub async fn stop(&self, target: &SshTarget) -> graphforge_remote::Result<()> {
        self.runner
            .run_script(target, &scripts::stop_service())
            .await
    }

    /// Open the service ports on a client instance
    pub async fn open_firewall(&self, target: &SshTarget) -> graphforge_remote::Result<()> {
        self.runner
            .run_script(target, &scripts::open_firewall())
            .await
    }
}
