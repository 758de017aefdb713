//! Prober error types

use thiserror::Error;
use shared::ConfigError;

/// Result type for prober operations
pub type ProberResult<T> = Result<T, ProberError>;

/// Prober error types
///
/// Probe outcomes never surface here; they are carried as
/// [`shared::ProbeFailure`] values inside each result.
#[derive(Error, Debug)]
pub enum ProberError {
    #[error("{key} not found in {path}")]
    MissingCredential { key: String, path: String },

    #[error("Config file not found at: {path}")]
    ConfigFileMissing { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid selection: {input}")]
    InvalidSelection { input: String },
}

impl ProberError {
    /// Errors that end the process with a non-zero status
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProberError::MissingCredential { .. })
    }
}
