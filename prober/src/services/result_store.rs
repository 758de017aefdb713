//! Plain-text result dumps under a scratch directory

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs;

use shared::ProbeResult;
use crate::core::utils::{format_duration, truncate};
use crate::error::ProberResult;
use crate::traits::ResultStore;

pub const DEFAULT_OUTPUT_DIR: &str = "tmp";
pub const COMPARISON_FILE: &str = "gemini-model-comparison.txt";

/// Real result store writing one text file per result
pub struct RealResultStore {
    base_dir: PathBuf,
}

impl RealResultStore {
    /// Store writing under `./tmp`
    pub fn new() -> Self {
        Self::with_base_dir(PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn model_output_path(&self, model: &str) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let safe_model = model.replace(['/', '\\'], "_");
        self.base_dir.join(format!("{safe_model}-test-{timestamp}.txt"))
    }
}

impl Default for RealResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for RealResultStore {
    async fn save_model_output(&self, result: &ProbeResult) -> ProberResult<PathBuf> {
        fs::create_dir_all(&self.base_dir).await?;
        let path = self.model_output_path(&result.model);
        fs::write(&path, render_model_output(result)).await?;
        tracing::debug!(path = %path.display(), model = %result.model, "saved model output");
        Ok(path)
    }

    async fn save_comparison(&self, results: &[ProbeResult]) -> ProberResult<PathBuf> {
        fs::create_dir_all(&self.base_dir).await?;
        let path = self.base_dir.join(COMPARISON_FILE);
        fs::write(&path, render_comparison(results)).await?;
        tracing::debug!(path = %path.display(), models = results.len(), "saved comparison");
        Ok(path)
    }
}

/// Body of a single-model dump
pub fn render_model_output(result: &ProbeResult) -> String {
    let rule = "_".repeat(50);
    let mut out = format!("{} TEST\n", result.model.to_uppercase());
    if result.success {
        let usage = result.usage.unwrap_or_default();
        out.push_str(&format!("Input: {} tokens\n", usage.input_tokens));
        out.push_str(&format!("Output: {} tokens\n", usage.output_tokens));
    }
    out.push_str(&format!("Duration: {}\n", format_duration(result.elapsed)));
    out.push_str(&rule);
    out.push('\n');
    match &result.failure {
        None => out.push_str(result.text.as_deref().unwrap_or_default()),
        Some(failure) => out.push_str(&format!("ERROR: {}", failure_summary(failure))),
    }
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out
}

/// Body of the comparison file
pub fn render_comparison(results: &[ProbeResult]) -> String {
    let mut out = String::from("Gemini Model Comparison for Changelog Generation\n");
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");
    for result in results {
        out.push_str(&format!("Model: {}\n", result.model));
        out.push_str(&"-".repeat(40));
        out.push('\n');
        out.push_str(&comparison_text(result));
        out.push_str("\n\n");
    }
    out
}

/// Output text or a one-line failure description for a comparison entry
pub fn comparison_text(result: &ProbeResult) -> String {
    match &result.failure {
        None => result.text.clone().unwrap_or_default(),
        Some(failure) if failure.status().is_some() => {
            format!("❌ API error for {}: {}", result.model, truncate(failure.message(), 100))
        }
        Some(failure) => format!("❌ Error for {}: {}", result.model, truncate(&failure.to_string(), 100)),
    }
}

/// Classification plus the endpoint message, cut to display length
pub fn failure_summary(failure: &shared::ProbeFailure) -> String {
    match failure.status() {
        Some(status) => format!("HTTP {status}: {}", truncate(failure.message(), 100)),
        None => truncate(&failure.to_string(), 100),
    }
}
