//! Tests for RealResultStore and the dump renderers

use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;

use shared::{FinishReason, ProbeFailure, ProbeResult, ProbeTask, TokenUsage};
use crate::services::result_store::{
    comparison_text, render_comparison, render_model_output, RealResultStore, COMPARISON_FILE,
};
use crate::traits::ResultStore;

fn success(model: &str, text: &str) -> ProbeResult {
    ProbeResult::succeeded(
        &ProbeTask::for_model(model, "AIzaTestKey"),
        Some(text.to_string()),
        Some(FinishReason::Stop),
        Some(TokenUsage { input_tokens: 120, output_tokens: 45, total_tokens: 165 }),
        Duration::from_millis(2300),
    )
}

fn failure(model: &str, failure: ProbeFailure) -> ProbeResult {
    ProbeResult::failed(&ProbeTask::for_model(model, "AIzaTestKey"), failure, Duration::from_millis(420))
}

#[test]
fn test_render_successful_model_output() {
    let rendered = render_model_output(&success("gemini-2.5-flash", "### Added\n- CLI"));
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "GEMINI-2.5-FLASH TEST");
    assert_eq!(lines[1], "Input: 120 tokens");
    assert_eq!(lines[2], "Output: 45 tokens");
    assert_eq!(lines[3], "Duration: 2.3s");
    assert_eq!(lines[4], "_".repeat(50));
    assert!(rendered.contains("### Added\n- CLI"));
    assert!(rendered.ends_with(&format!("{}\n", "_".repeat(50))));
}

#[test]
fn test_render_failed_model_output() {
    let rendered = render_model_output(&failure(
        "gemini-2.5-pro",
        ProbeFailure::RateLimited { message: "Quota exceeded".to_string() },
    ));

    assert!(!rendered.contains("Input:"));
    assert!(rendered.contains("Duration: 420ms"));
    assert!(rendered.contains("ERROR: HTTP 429: Quota exceeded"));
}

#[test]
fn test_comparison_text_variants() {
    assert_eq!(comparison_text(&success("m", "entry")), "entry");

    let api = failure("m", ProbeFailure::PermissionDenied { message: "denied".to_string() });
    assert_eq!(comparison_text(&api), "❌ API error for m: denied");

    let transport = failure("m", ProbeFailure::Connection("connection refused".to_string()));
    assert_eq!(comparison_text(&transport), "❌ Error for m: connection error: connection refused");
}

#[test]
fn test_render_comparison_layout() {
    let rendered = render_comparison(&[success("a", "first"), success("b", "second")]);

    assert!(rendered.starts_with("Gemini Model Comparison for Changelog Generation\n"));
    assert!(rendered.contains(&"=".repeat(60)));
    assert!(rendered.contains(&format!("Model: a\n{}\nfirst\n\n", "-".repeat(40))));
    assert!(rendered.contains(&format!("Model: b\n{}\nsecond\n\n", "-".repeat(40))));
}

#[tokio::test]
async fn test_save_model_output_creates_directory() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("nested").join("tmp");
    let store = RealResultStore::with_base_dir(&base);

    let path = store.save_model_output(&success("gemini-2.5-flash", "hello")).await.unwrap();

    assert!(path.starts_with(&base));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("gemini-2.5-flash-test-"));
    assert!(name.ends_with(".txt"));

    let content = fs::read_to_string(&path).await.unwrap();
    assert!(content.contains("hello"));
}

#[tokio::test]
async fn test_save_comparison_overwrites_fixed_file() {
    let dir = TempDir::new().unwrap();
    let store = RealResultStore::with_base_dir(dir.path());

    store.save_comparison(&[success("old", "stale")]).await.unwrap();
    let path = store.save_comparison(&[success("new", "fresh")]).await.unwrap();

    assert_eq!(path, dir.path().join(COMPARISON_FILE));
    let content = fs::read_to_string(&path).await.unwrap();
    assert!(content.contains("fresh"));
    assert!(!content.contains("stale"));
}
