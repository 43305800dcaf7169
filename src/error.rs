//! Error types for eth-log-audit

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Provider-related errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while talking to a JSON-RPC provider.
///
/// A run aborts on the first provider error; no commitment is computed
/// for either side.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Connection to {url} failed: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("HTTP error from {url}: status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("RPC error from {url}: {message} (code {code})")]
    Rpc {
        url: String,
        code: i64,
        message: String,
    },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Log from {url} is missing required field `{field}`")]
    MissingField { url: String, field: &'static str },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration and input validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid block number: {0}")]
    InvalidBlockNumber(String),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid config file: {0}")]
    InvalidFile(String),

    #[error("Config file parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for this error.
    ///
    /// Config errors exit with 2 and provider errors with 3, so callers can
    /// tell a bad invocation from a failed fetch. Exit code 1 is reserved for
    /// a successful audit that detected a mismatch.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Provider(_) => 3,
            Error::Io(_) | Error::Json(_) => 3,
        }
    }
}
