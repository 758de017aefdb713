//! Tests for ProbeRunner

use std::sync::Arc;
use std::time::Duration;

use shared::{ProbeFailure, ProbeTask};
use super::common::{generation, quick_profile, Reply, ScriptedClient};
use crate::services::console::MemorySink;
use crate::services::probe_runner::{sort_results, BatchSummary, ProbeRunner};
use crate::traits::MockGenerationClient;
use crate::types::ProbeProfile;

fn tasks(models: &[&str]) -> Vec<ProbeTask> {
    models.iter().map(|model| ProbeTask::for_model(model, "AIzaTestKey")).collect()
}

fn rate_limited() -> ProbeFailure {
    ProbeFailure::RateLimited { message: "Resource has been exhausted".to_string() }
}

#[tokio::test]
async fn test_batch_yields_one_result_per_task() {
    let client = ScriptedClient::new()
        .reply("m2", Reply::Fail(rate_limited()), Duration::ZERO)
        .reply("m4", Reply::Fail(ProbeFailure::Connection("refused".to_string())), Duration::ZERO);
    let runner = ProbeRunner::new(Arc::new(client), ProbeProfile::key_check());

    let results = runner.run(tasks(&["m1", "m2", "m3", "m4", "m5", "m6"]), true).await;

    assert_eq!(results.len(), 6);
    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 2);

    let failed: Vec<_> = results.iter().filter(|r| !r.success).map(|r| r.task_id.as_str()).collect();
    assert!(failed.contains(&"m2"));
    assert!(failed.contains(&"m4"));
}

#[tokio::test]
async fn test_parallel_respects_concurrency_limit() {
    let mut client = ScriptedClient::new();
    for model in ["a", "b", "c", "d", "e", "f", "g", "h"] {
        client = client.reply(model, Reply::Text("ok"), Duration::from_millis(40));
    }
    let client = Arc::new(client);
    let runner = ProbeRunner::new(client.clone(), ProbeProfile::key_check()).with_concurrency(3);

    let results = runner.run(tasks(&["a", "b", "c", "d", "e", "f", "g", "h"]), true).await;

    assert_eq!(results.len(), 8);
    assert!(client.peak() <= 3, "peak in flight was {}", client.peak());
    assert!(client.peak() >= 2, "tasks should overlap");
}

#[tokio::test]
async fn test_timeout_is_isolated_to_its_task() {
    let client = ScriptedClient::new()
        .reply("t1", Reply::Text("one"), Duration::from_millis(10))
        .reply("t2", Reply::Text("never"), Duration::from_secs(5))
        .reply("t3", Reply::Text("three"), Duration::from_millis(10))
        .reply("t4", Reply::Text("four"), Duration::from_millis(10))
        .reply("t5", Reply::Text("five"), Duration::from_millis(10));
    let runner = ProbeRunner::new(Arc::new(client), quick_profile(Duration::from_millis(100))).with_concurrency(5);

    let mut results = runner.run(tasks(&["t1", "t2", "t3", "t4", "t5"]), true).await;
    sort_results(&mut results);

    assert_eq!(results.len(), 5);
    assert!(!results[1].success);
    assert!(matches!(results[1].failure, Some(ProbeFailure::Connection(_))));
    assert!(results.iter().enumerate().all(|(i, r)| i == 1 || r.success));
    assert_eq!(results[2].text.as_deref(), Some("three"));
}

#[tokio::test]
async fn test_three_tasks_with_second_timing_out() {
    let client = ScriptedClient::new()
        .reply("task-1", Reply::Text("first"), Duration::from_millis(20))
        .reply("task-2", Reply::Text("late"), Duration::from_secs(10))
        .reply("task-3", Reply::Fail(rate_limited()), Duration::ZERO);
    let runner = ProbeRunner::new(Arc::new(client), quick_profile(Duration::from_millis(50))).with_concurrency(5);

    let mut results = runner.run(tasks(&["task-1", "task-2", "task-3"]), true).await;
    assert_eq!(results.len(), 3);
    sort_results(&mut results);

    assert!(results[0].success);
    assert_eq!(results[1].error_label().as_deref(), Some("connection error"));
    assert_eq!(results[2].error_label().as_deref(), Some("rate limited, possibly valid"));
}

#[tokio::test]
async fn test_panicking_task_becomes_aborted_result() {
    let client = ScriptedClient::new().reply("boom", Reply::Panic, Duration::ZERO);
    let runner = ProbeRunner::new(Arc::new(client), ProbeProfile::key_check());

    let mut results = runner.run(tasks(&["boom", "fine"]), true).await;
    sort_results(&mut results);

    assert_eq!(results.len(), 2);
    assert!(matches!(results[0].failure, Some(ProbeFailure::Aborted(_))));
    assert_eq!(results[0].task_id, "boom");
    assert!(results[1].success);
}

#[tokio::test]
async fn test_sequential_preserves_submission_order() {
    let client = Arc::new(
        ScriptedClient::new()
            .reply("slow", Reply::Text("slow"), Duration::from_millis(30))
            .reply("fast", Reply::Text("fast"), Duration::ZERO),
    );
    let runner = ProbeRunner::new(client.clone(), ProbeProfile::key_check());

    let results = runner.run(tasks(&["slow", "fast"]), false).await;

    let ids: Vec<_> = results.iter().map(|r| r.task_id.as_str()).collect();
    assert_eq!(ids, vec!["slow", "fast"]);
    assert_eq!(client.calls(), vec!["slow".to_string(), "fast".to_string()]);
    assert_eq!(client.peak(), 1);
}

#[tokio::test]
async fn test_single_task_runs_without_progress_lines() {
    let sink = Arc::new(MemorySink::new());
    let runner = ProbeRunner::new(Arc::new(ScriptedClient::new()), ProbeProfile::key_check()).with_sink(sink.clone());

    let results = runner.run(tasks(&["only"]), true).await;

    assert_eq!(results.len(), 1);
    assert!(!sink.contains("🚀 Starting"));
}

#[tokio::test]
async fn test_parallel_reports_progress_to_sink() {
    let sink = Arc::new(MemorySink::new());
    let runner = ProbeRunner::new(Arc::new(ScriptedClient::new()), ProbeProfile::key_check()).with_sink(sink.clone());

    runner.run(tasks(&["x", "y"]), true).await;

    assert!(sink.contains("🚀 Starting x..."));
    assert!(sink.contains("🚀 Starting y..."));
    assert!(sink.contains("✅ Completed x in"));
    assert!(sink.contains("✅ Completed y in"));
}

#[tokio::test]
async fn test_empty_batch() {
    let runner = ProbeRunner::new(Arc::new(ScriptedClient::new()), ProbeProfile::key_check());
    assert!(runner.run(Vec::new(), true).await.is_empty());
    assert!(runner.run(Vec::new(), false).await.is_empty());
}

#[tokio::test]
async fn test_probe_passes_profile_to_client() {
    let mut client = MockGenerationClient::new();
    client
        .expect_generate()
        .withf(|model, credential, profile| {
            model.to_string() == "gemini-2.5-flash" && credential.to_string() == "AIzaTestKey" && profile.name == "debug"
        })
        .times(1)
        .returning(|_, _, _| Ok(generation("Hello there")));

    let runner = ProbeRunner::new(Arc::new(client), ProbeProfile::debug());
    let result = runner.probe(&ProbeTask::for_model("gemini-2.5-flash", "AIzaTestKey")).await;

    assert!(result.success);
    assert_eq!(result.text.as_deref(), Some("Hello there"));
    assert_eq!(result.usage.map(|u| u.total_tokens), Some(15));
}

#[tokio::test]
async fn test_failure_is_carried_in_result() {
    let mut client = MockGenerationClient::new();
    client
        .expect_generate()
        .returning(|_, _, _| Err(ProbeFailure::PermissionDenied { message: "denied".to_string() }));

    let runner = ProbeRunner::new(Arc::new(client), ProbeProfile::key_check());
    let result = runner.probe(&ProbeTask::for_model("m", "k")).await;

    assert!(!result.success);
    assert_eq!(result.error_label().as_deref(), Some("denied"));
    assert!(result.text.is_none());
}

#[test]
fn test_concurrency_floor_is_one() {
    let runner = ProbeRunner::new(Arc::new(ScriptedClient::new()), ProbeProfile::key_check()).with_concurrency(0);
    assert_eq!(runner.concurrency(), 1);
}
