//! Error types and exit codes for dashcast

use std::process::ExitCode;
use thiserror::Error;

/// Main error type for dashcast operations
#[derive(Error, Debug)]
pub enum DashError {
    #[error("Invalid document path '{path}': empty segment")]
    InvalidPath { path: String },

    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Unsupported frame version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Frame payload is not a JSON document: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    /// Convert error to a process exit code:
    /// - 1: IO error
    /// - 2: Listener could not be bound
    /// - 3: Config error
    /// - 4: Document / frame encoding failure
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Io(_) => ExitCode::from(1),
            Self::Bind { .. } => ExitCode::from(2),
            Self::ConfigError { .. } => ExitCode::from(3),
            Self::InvalidPath { .. } => ExitCode::from(4),
            Self::PayloadTooLarge { .. } => ExitCode::from(4),
            Self::UnsupportedVersion { .. } => ExitCode::from(4),
            Self::Serialize(_) => ExitCode::from(4),
            Self::InvalidPayload(_) => ExitCode::from(4),
        }
    }
}

/// Result type alias for dashcast operations
pub type Result<T> = std::result::Result<T, DashError>;
