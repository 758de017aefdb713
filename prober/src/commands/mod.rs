//! Diagnostic commands
//!
//! Each command reads the configuration it needs from the [`ProbeContext`],
//! reports through its [`OutputSink`] and returns a value that tests can
//! inspect. Probe failures are part of the report, not errors.

pub mod compare;
pub mod debug;
pub mod helper;
pub mod keys;
pub mod manager;
pub mod models;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::{ConfigMap, ProbeResult, GEMINI_KEY, GEMINI_MODEL};
use crate::error::{ProberError, ProberResult};
use crate::services::probe_runner::{BatchSummary, ProbeRunner, DEFAULT_CONCURRENCY};
use crate::traits::{GenerationClient, OutputSink, Prompter, ResultStore};
use crate::types::{ProbeProfile, Style};

/// Read the config file; an unreadable file is reported, not fatal
pub fn load_config(path: &Path) -> ProberResult<ConfigMap> {
    Ok(ConfigMap::load(path)?)
}

/// Everything a command needs, passed explicitly
pub struct ProbeContext {
    pub config: ConfigMap,
    pub config_path: PathBuf,
    pub client: Arc<dyn GenerationClient>,
    pub store: Arc<dyn ResultStore>,
    pub sink: Arc<dyn OutputSink>,
    pub prompter: Arc<dyn Prompter>,
    pub concurrency: usize,
}

impl ProbeContext {
    pub fn new(
        config: ConfigMap,
        config_path: impl Into<PathBuf>,
        client: Arc<dyn GenerationClient>,
        store: Arc<dyn ResultStore>,
        sink: Arc<dyn OutputSink>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            config,
            config_path: config_path.into(),
            client,
            store,
            sink,
            prompter,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Runner for `profile` sharing this context's client, sink and pool size
    pub fn runner(&self, profile: ProbeProfile) -> ProbeRunner {
        ProbeRunner::new(Arc::clone(&self.client), profile)
            .with_concurrency(self.concurrency)
            .with_sink(Arc::clone(&self.sink))
    }

    /// The primary credential, or a fatal missing-credential error
    pub fn require_key(&self) -> ProberResult<String> {
        self.config
            .get_non_empty(GEMINI_KEY)
            .map(str::to_string)
            .ok_or_else(|| ProberError::MissingCredential {
                key: GEMINI_KEY.to_string(),
                path: self.config_path.display().to_string(),
            })
    }

    pub fn default_model(&self) -> Option<&str> {
        self.config.get_non_empty(GEMINI_MODEL)
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Write `config` to the config file and adopt it
    pub fn save_config(&mut self, config: ConfigMap, header: Option<&str>) -> ProberResult<()> {
        config.save(&self.config_path, header)?;
        self.config = config;
        Ok(())
    }

    /// Print how many models in a batch answered
    pub fn say_batch_summary(&self, results: &[ProbeResult]) -> BatchSummary {
        let summary = BatchSummary::from_results(results);
        let (style, icon) = if summary.failed == 0 {
            (Style::Success, "✅")
        } else {
            (Style::Warning, "⚠️ ")
        };
        self.say(style, &format!("{icon} {}/{} models succeeded", summary.succeeded, summary.total));
        summary
    }

    pub fn say(&self, style: Style, text: &str) {
        self.sink.emit(style, text);
    }

    pub fn blank(&self) {
        self.sink.blank();
    }

    pub fn ask(&self, prompt: &str) -> Option<String> {
        self.prompter.ask(prompt)
    }
}
