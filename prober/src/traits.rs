//! Prober trait definitions for dependency injection

use std::path::PathBuf;
use async_trait::async_trait;

use shared::{ProbeFailure, ProbeResult};
use crate::error::ProberResult;
use crate::types::{Generation, ProbeProfile, Style};

/// One-shot generation call against the external endpoint
#[mockall::automock]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send the profile's prompt to `model` using `credential`.
    ///
    /// Every failure mode (HTTP status, error body, transport, timeout) is
    /// returned as a classified [`ProbeFailure`].
    async fn generate(
        &self,
        model: &str,
        credential: &str,
        profile: &ProbeProfile,
    ) -> Result<Generation, ProbeFailure>;
}

/// Destination for human-readable report lines
pub trait OutputSink: Send + Sync {
    /// Emit one styled line
    fn emit(&self, style: Style, text: &str);

    fn blank(&self) {
        self.emit(Style::Plain, "");
    }
}

/// Source of interactive answers
pub trait Prompter: Send + Sync {
    /// Ask a question; `None` means input is exhausted
    fn ask(&self, prompt: &str) -> Option<String>;
}

/// Storage for plain-text result dumps
#[mockall::automock]
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Write one model's result and return the file path
    async fn save_model_output(&self, result: &ProbeResult) -> ProberResult<PathBuf>;

    /// Write the side-by-side comparison file and return its path
    async fn save_comparison(&self, results: &[ProbeResult]) -> ProberResult<PathBuf>;
}
