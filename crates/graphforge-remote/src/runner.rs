//! SSH/SCP process runner

use crate::error::{RemoteError, Result};
use crate::target::SshTarget;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Per-connection timeout passed to ssh itself
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Wall-clock cap on a single probe attempt (covers DNS, TCP and auth)
const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote execution abstraction
///
/// A non-zero remote exit status is always an error; none of these methods
/// retry. Retrying is a workflow decision, not a transport one.
#[async_trait]
pub trait RemoteRunner: Send + Sync {
    /// Minimal authenticated round-trip, used to decide reachability.
    /// Auth failure, timeout and connection refusal are indistinguishable
    /// to callers; all mean "not reachable yet".
    async fn probe(&self, target: &SshTarget) -> Result<()>;

    /// Pipe `script` to `bash -s` on the target and wait for it to finish
    async fn run_script(&self, target: &SshTarget, script: &str) -> Result<()>;

    /// Copy a local file to `remote_path` on the target
    async fn copy_file(&self, target: &SshTarget, local: &Path, remote_path: &str) -> Result<()>;
}

/// Runner backed by the system `ssh` and `scp` binaries
#[derive(Debug, Default)]
pub struct OpenSsh;

impl OpenSsh {
    pub fn new() -> Self {
        Self
    }
}

/// Common ssh/scp options: explicit key, no host key prompt, no password
/// fallback, bounded connect time.
fn auth_args(target: &SshTarget) -> Vec<String> {
    vec![
        "-i".to_string(),
        target.key_path().display().to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "PasswordAuthentication=no".to_string(),
        "-o".to_string(),
        format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}"),
    ]
}

fn check_status(output: std::process::Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    match output.status.code() {
        Some(status) => Err(RemoteError::ScriptFailed {
            status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        None => Err(RemoteError::Killed),
    }
}

#[async_trait]
impl RemoteRunner for OpenSsh {
    async fn probe(&self, target: &SshTarget) -> Result<()> {
        let mut cmd = Command::new("ssh");
        cmd.args(auth_args(target))
            .arg(target.destination())
            .arg("echo 'SSH is up'")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("Probing ssh {}", target.destination());

        let output = tokio::time::timeout(PROBE_TIMEOUT, cmd.output())
            .await
            .map_err(|_| RemoteError::AttemptTimeout {
                seconds: PROBE_TIMEOUT.as_secs(),
            })??;

        check_status(output)
    }

    async fn run_script(&self, target: &SshTarget, script: &str) -> Result<()> {
        let mut cmd = Command::new("ssh");
        cmd.args(auth_args(target))
            .arg(target.destination())
            .arg("bash")
            .arg("-s")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(
            "Running remote script on {} ({} bytes)",
            target.destination(),
            script.len()
        );

        let mut child = cmd.spawn()?;
        {
            // stdin is piped above, so it is always present
            let mut stdin = child.stdin.take().expect("child stdin requested");
            stdin.write_all(script.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        check_status(output)
    }

    async fn copy_file(&self, target: &SshTarget, local: &Path, remote_path: &str) -> Result<()> {
        let mut cmd = Command::new("scp");
        cmd.args(auth_args(target))
            .arg(local)
            .arg(format!("{}:{}", target.destination(), remote_path))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(
            "Copying {} to {}:{}",
            local.display(),
            target.destination(),
            remote_path
        );

        let output = cmd.output().await?;
        check_status(output).map_err(|e| RemoteError::CopyFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::SshTarget;

    #[test]
    fn auth_args_disable_password_auth() {
        let target = SshTarget::root("192.0.2.1".parse().unwrap(), "/keys/builder");
        let args = auth_args(&target);

        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/keys/builder");
        assert!(args.contains(&"PasswordAuthentication=no".to_string()));
        assert!(args.contains(&"StrictHostKeyChecking=no".to_string()));
        assert!(args.contains(&"ConnectTimeout=10".to_string()));
    }

    #[test]
    fn nonzero_exit_maps_to_script_failed() {
        use std::os::unix::process::ExitStatusExt;
        let output = std::process::Output {
            status: std::process::ExitStatus::from_raw(1 << 8),
            stdout: Vec::new(),
            stderr: b"bash: line 3: docker: command not found\n".to_vec(),
        };

        match check_status(output) {
            Err(RemoteError::ScriptFailed { status, stderr }) => {
                assert_eq!(status, 1);
                assert!(stderr.contains("command not found"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
