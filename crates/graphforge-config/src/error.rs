//! Configuration error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    #[error("home directory could not be determined for default key path")]
    HomeDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
