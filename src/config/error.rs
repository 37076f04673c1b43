//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database timeout")]
    InvalidDatabaseTimeout,

    #[error("Connect attempts must be at least 1")]
    InvalidRetryAttempts,

    #[error("Initial backoff exceeds maximum backoff")]
    InvalidBackoff,

    #[error("Invalid SQL identifier for {field}: {value}")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("Upload body limit must be greater than zero")]
    InvalidBodyLimit,

    #[error("Invalid upload read timeout")]
    InvalidReadTimeout,

    #[error("Upload read timeout ({read_secs}s) must be shorter than the request timeout ({request_secs}s)")]
    ReadTimeoutNotBelowRequest { read_secs: u64, request_secs: u64 },
}
