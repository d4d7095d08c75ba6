use std::path::PathBuf;

use thiserror::Error;

/// Errors loading the dataset files.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("malformed row in {} (line {line}): {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// Errors from the forecasting service. The dispatcher collapses all of them
/// into a single "service down" outcome; the variants exist for logging.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed: {0}")]
    Transport(String),

    #[error("forecast request timed out after {0}s")]
    Timeout(u64),

    #[error("forecast service returned HTTP {status}")]
    Status { status: u16 },

    #[error("unexpected forecast response: {0}")]
    Decode(String),
}

/// Errors talking to the chat platform.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("chat API request failed: {0}")]
    Request(String),

    #[error("chat API rejected the call: {0}")]
    Rejected(String),

    #[error("chat API token is not configured")]
    MissingToken,
}

/// Errors that stop an ingress adapter.
#[derive(Debug, Error)]
pub enum IngressError {
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },

    #[error("server error: {0}")]
    Server(String),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },
}
