//! Bounded fan-out of independent probe calls

use std::sync::Arc;
use std::time::{Duration, Instant};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use shared::{ProbeFailure, ProbeResult, ProbeTask};
use crate::traits::{GenerationClient, OutputSink};
use crate::types::{ProbeProfile, Style};

/// Default number of probes allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runs probe tasks against a [`GenerationClient`]
///
/// Tasks share nothing but the client. A failing task yields a failed
/// [`ProbeResult`]; it never cuts the batch short, so a batch of N tasks
/// always produces N results.
#[derive(Clone)]
pub struct ProbeRunner {
    client: Arc<dyn GenerationClient>,
    profile: Arc<ProbeProfile>,
    concurrency: usize,
    sink: Option<Arc<dyn OutputSink>>,
}

impl ProbeRunner {
    pub fn new(client: Arc<dyn GenerationClient>, profile: ProbeProfile) -> Self {
        Self {
            client,
            profile: Arc::new(profile),
            concurrency: DEFAULT_CONCURRENCY,
            sink: None,
        }
    }

    /// Cap on simultaneous outbound calls (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Report start/completion of parallel tasks to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn profile(&self) -> &ProbeProfile {
        &self.profile
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Probe a single task
    pub async fn probe(&self, task: &ProbeTask) -> ProbeResult {
        execute(self.client.as_ref(), &self.profile, task).await
    }

    /// Parallel when asked for and there is more than one task
    pub async fn run(&self, tasks: Vec<ProbeTask>, parallel: bool) -> Vec<ProbeResult> {
        if parallel && tasks.len() > 1 {
            self.run_parallel(tasks).await
        } else {
            self.run_sequential(tasks).await
        }
    }

    /// Run tasks one after another, in submission order
    pub async fn run_sequential(&self, tasks: Vec<ProbeTask>) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(tasks.len());
        for task in &tasks {
            results.push(self.probe(task).await);
        }
        results
    }

    /// Run tasks concurrently, collecting results in completion order
    pub async fn run_parallel(&self, tasks: Vec<ProbeTask>) -> Vec<ProbeResult> {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut pending = FuturesUnordered::new();

        for task in tasks {
            let client = Arc::clone(&self.client);
            let profile = Arc::clone(&self.profile);
            let sink = self.sink.clone();
            let permits = Arc::clone(&permits);
            let submitted = task.clone();

            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                if let Some(sink) = &sink {
                    sink.emit(Style::Info, &format!("🚀 Starting {}...", task.id));
                }
                let result = execute(client.as_ref(), &profile, &task).await;
                if let Some(sink) = &sink {
                    sink.emit(
                        Style::Success,
                        &format!("✅ Completed {} in {:.1}s", task.id, result.elapsed.as_secs_f64()),
                    );
                }
                result
            });

            pending.push(async move { (submitted, handle.await) });
        }

        let mut results = Vec::with_capacity(pending.len());
        while let Some((task, joined)) = pending.next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(task = %task.id, error = %e, "probe task did not complete");
                    results.push(ProbeResult::failed(&task, ProbeFailure::Aborted(e.to_string()), Duration::ZERO));
                }
            }
        }

        let summary = BatchSummary::from_results(&results);
        tracing::info!(total = summary.total, succeeded = summary.succeeded, failed = summary.failed, "parallel batch finished");
        results
    }
}

async fn execute(client: &dyn GenerationClient, profile: &ProbeProfile, task: &ProbeTask) -> ProbeResult {
    tracing::debug!(task = %task.id, model = %task.model, profile = profile.name, "dispatching probe");
    let started = Instant::now();
    let outcome = client.generate(&task.model, &task.credential, profile).await;
    let elapsed = started.elapsed();

    let result = match outcome {
        Ok(generation) => ProbeResult::succeeded(
            task,
            generation.text,
            Some(generation.finish_reason),
            generation.usage,
            elapsed,
        ),
        Err(failure) => ProbeResult::failed(task, failure, elapsed),
    };

    tracing::debug!(
        task = %task.id,
        success = result.success,
        elapsed_ms = elapsed.as_millis() as u64,
        "probe finished"
    );
    result
}

/// Order results by task id for deterministic display
pub fn sort_results(results: &mut [ProbeResult]) {
    results.sort_by(|a, b| a.task_id.cmp(&b.task_id));
}

/// Aggregate counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}
