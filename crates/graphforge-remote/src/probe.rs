//! Reachability probing
//!
//! After a server is created it takes a while before sshd accepts
//! connections. The prober hammers the probe endpoint on a fixed-interval
//! budget and reports plain `true`/`false`; exhausting the budget is an
//! expected outcome the orchestrator turns into a workflow decision, not
//! an error raised from here.

use crate::runner::RemoteRunner;
use crate::target::SshTarget;
use graphforge_cloud::retry::{self, Poll, PollConfig};

/// Wait until `target` accepts an authenticated command.
///
/// Every attempt failure (refused, timed out, auth rejected while booting)
/// is treated identically: sleep, retry. Returns `false` once the budget
/// is exhausted.
pub async fn wait_reachable(
    runner: &dyn RemoteRunner,
    target: &SshTarget,
    config: PollConfig,
) -> bool {
    tracing::info!(
        "Waiting for SSH on {} (up to {:?})",
        target.destination(),
        config.deadline()
    );

    let outcome = retry::poll_until(config, || async {
        match runner.probe(target).await {
            Ok(()) => Some(()),
            Err(e) => {
                tracing::debug!("ssh not ready yet: {}", e);
                None
            }
        }
    })
    .await;

    match outcome {
        Poll::Ready(()) => {
            tracing::info!("SSH is up on {}", target.destination());
            true
        }
        Poll::Exhausted { attempts } => {
            tracing::warn!(
                "SSH never came up on {} after {} attempts",
                target.destination(),
                attempts
            );
            false
        }
    }
}
