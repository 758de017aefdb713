//! Builders wiring a ProbeContext to a local mock endpoint

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prober::services::{MemorySink, RealGeminiClient, RealResultStore, ScriptedPrompter};
use prober::ProbeContext;
use shared::ConfigMap;

/// Everything a command test needs to inspect afterwards
pub struct TestContext {
    pub ctx: ProbeContext,
    pub sink: Arc<MemorySink>,
    pub prompter: Arc<ScriptedPrompter>,
    pub server: MockServer,
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    // Keeps the directory alive for the duration of the test
    _dir: TempDir,
}

impl TestContext {
    pub fn output(&self) -> String {
        self.sink.text()
    }

    pub fn config_on_disk(&self) -> String {
        std::fs::read_to_string(&self.config_path).unwrap_or_default()
    }
}

pub struct ContextBuilder {
    config: Option<String>,
    answers: Vec<String>,
    concurrency: usize,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            answers: Vec::new(),
            concurrency: 5,
        }
    }

    /// Write `content` as the config file; without this the file is absent
    pub fn with_config(mut self, content: impl Into<String>) -> Self {
        self.config = Some(content.into());
        self
    }

    pub fn with_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers = answers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub async fn build(self) -> TestContext {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(".env");
        let output_dir = dir.path().join("tmp");
        if let Some(content) = &self.config {
            std::fs::write(&config_path, content).unwrap();
        }

        let server = MockServer::start().await;
        let client = RealGeminiClient::with_base_url(format!("{}/v1beta", server.uri())).unwrap();
        let config = ConfigMap::load(&config_path).unwrap();
        let sink = Arc::new(MemorySink::new());
        let prompter = Arc::new(ScriptedPrompter::new(self.answers));

        let ctx = ProbeContext::new(
            config,
            config_path.clone(),
            Arc::new(client),
            Arc::new(RealResultStore::with_base_dir(&output_dir)),
            sink.clone(),
            prompter.clone(),
        )
        .with_concurrency(self.concurrency);

        TestContext {
            ctx,
            sink,
            prompter,
            server,
            config_path,
            output_dir,
            _dir: dir,
        }
    }
}

/// Answer requests for `model` made with `key`
pub async fn mount_model(server: &MockServer, model: &str, key: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{model}:generateContent")))
        .and(query_param("key", key))
        .respond_with(response)
        .mount(server)
        .await;
}
