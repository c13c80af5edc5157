//! Remote execution error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("remote command exited with status {status}: {stderr}")]
    ScriptFailed { status: i32, stderr: String },

    #[error("remote command killed by signal")]
    Killed,

    #[error("connection attempt timed out after {seconds}s")]
    AttemptTimeout { seconds: u64 },

    #[error("file copy failed: {0}")]
    CopyFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RemoteError>;
