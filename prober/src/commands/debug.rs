//! Detailed diagnosis of the primary key

use shared::{ProbeFailure, ProbeResult, ProbeTask, DEFAULT_MODEL, TEST_MODELS};
use crate::commands::ProbeContext;
use crate::core::utils::{check_key_format, error_hints, head, mask_key, tail, KeyFormatReport, KEY_PREFIX};
use crate::error::ProberResult;
use crate::services::probe_runner::sort_results;
use crate::types::{ProbeProfile, Style};

#[derive(Debug, Clone)]
pub struct DebugReport {
    pub format: KeyFormatReport,
    pub detailed: ProbeResult,
    /// Alternative models that answered; only probed when the detailed call failed
    pub working_models: Vec<String>,
}

pub async fn run(ctx: &mut ProbeContext) -> ProberResult<DebugReport> {
    ctx.say(Style::Title, "🔧 Gemini API Diagnostic Tool");
    ctx.say(Style::Dim, &"=".repeat(35));
    ctx.blank();

    let key = match ctx.require_key() {
        Ok(key) => key,
        Err(e) => {
            ctx.say(Style::Error, &format!("❌ {e}"));
            return Err(e);
        }
    };

    let format = report_key_format(ctx, &key);
    ctx.blank();

    let detailed = detailed_test(ctx, &key, DEFAULT_MODEL).await;
    ctx.blank();

    let mut working_models = Vec::new();
    if !detailed.success {
        ctx.say(Style::Info, "🔍 Testing alternative models...");
        working_models = test_alternative_models(ctx, &key).await;

        if working_models.is_empty() {
            ctx.blank();
            ctx.say(Style::Error, "❌ No models are working. Possible issues:");
            ctx.say(Style::Plain, "   1. API key is invalid");
            ctx.say(Style::Plain, "   2. Billing not enabled in Google Cloud");
            ctx.say(Style::Plain, "   3. Generative Language API not enabled");
            ctx.say(Style::Plain, "   4. Project permissions issue");
        } else {
            ctx.blank();
            ctx.say(
                Style::Highlight,
                &format!("💡 In {}, set GEMINI_MODEL to one of these working models:", ctx.config_path.display()),
            );
            for model in &working_models {
                ctx.say(Style::Plain, &format!("    GEMINI_MODEL='{model}'"));
            }
        }
    }

    Ok(DebugReport { format, detailed, working_models })
}

fn report_key_format(ctx: &ProbeContext, key: &str) -> KeyFormatReport {
    let report = check_key_format(key);
    ctx.say(Style::Heading, "🔍 API Key Format Check:");
    ctx.say(Style::Plain, &format!("Length: {} characters", report.length));
    ctx.say(Style::Plain, &format!("Starts with: {}...", head(key, 10)));
    ctx.say(Style::Plain, &format!("Ends with: ...{}", tail(key, 10)));

    if report.has_prefix {
        ctx.say(Style::Success, &format!("✅ Format looks correct (starts with {KEY_PREFIX})"));
    } else {
        ctx.say(Style::Error, &format!("❌ Format issue: Should start with '{KEY_PREFIX}'"));
    }
    if report.length_ok {
        ctx.say(Style::Success, "✅ Length looks reasonable");
    } else {
        ctx.say(Style::Error, "❌ Length issue: Too short");
    }
    report
}

async fn detailed_test(ctx: &ProbeContext, key: &str, model: &str) -> ProbeResult {
    ctx.say(Style::Info, &format!("🔍 Testing API Key: {}", mask_key(key)));
    ctx.say(Style::Info, &format!("📡 Model: {model}"));
    ctx.blank();
    ctx.say(Style::Plain, "Test 1: Basic API call...");

    let runner = ctx.runner(ProbeProfile::debug());
    let result = runner.probe(&ProbeTask::for_model(model, key)).await;

    match &result.failure {
        None => {
            ctx.say(Style::Success, "✅ SUCCESS!");
            if let Some(text) = &result.text {
                ctx.say(Style::Plain, &format!("Response: {}", text.trim()));
            }
            if let Some(usage) = &result.usage {
                ctx.say(Style::Plain, &format!("Tokens used: {}", usage.total_tokens));
            }
        }
        Some(failure) => match failure.status() {
            Some(status) => {
                ctx.say(Style::Error, &format!("❌ HTTP Error {status}"));
                ctx.say(Style::Plain, &format!("Error Code: {status}"));
                ctx.say(Style::Plain, &format!("Error Message: {}", failure.message()));
                for hint in error_hints(failure.message()) {
                    ctx.say(Style::Warning, hint);
                }
            }
            None => match failure {
                ProbeFailure::ApiError { code, message } => {
                    ctx.say(Style::Error, &format!("❌ API Error {code}"));
                    ctx.say(Style::Plain, &format!("Error Message: {message}"));
                    for hint in error_hints(message) {
                        ctx.say(Style::Warning, hint);
                    }
                }
                ProbeFailure::MalformedResponse(message) => {
                    ctx.say(Style::Error, &format!("❌ No usable response: {message}"));
                }
                other => {
                    ctx.say(Style::Error, &format!("❌ Connection Error: {}", other.message()));
                }
            },
        },
    }
    result
}

async fn test_alternative_models(ctx: &ProbeContext, key: &str) -> Vec<String> {
    ctx.say(Style::Heading, "🧪 Testing different models...");
    ctx.say(Style::Dim, &"=".repeat(40));

    let tasks = TEST_MODELS
        .iter()
        .map(|model| ProbeTask::for_model(model, key))
        .collect();
    let mut results = ctx.runner(ProbeProfile::key_check()).run_sequential(tasks).await;
    sort_results(&mut results);

    let mut working = Vec::new();
    for result in &results {
        let model = &result.model;
        match &result.failure {
            None => {
                ctx.say(Style::Success, &format!("✅ {model} - Working"));
                working.push(model.clone());
            }
            Some(failure) => ctx.say(Style::Error, &format!("❌ {model} - {}", alternative_label(failure))),
        }
    }

    ctx.blank();
    ctx.say(Style::Heading, &format!("📊 Working models: {}", working.len()));
    for model in &working {
        ctx.say(Style::Success, &format!("  ✅ {model}"));
    }
    working
}

/// Short verdict for a model that did not answer
fn alternative_label(failure: &ProbeFailure) -> String {
    match failure {
        ProbeFailure::NotFound { .. } => "Not available".to_string(),
        ProbeFailure::PermissionDenied { .. } => "Permission denied".to_string(),
        ProbeFailure::ApiError { .. } | ProbeFailure::MalformedResponse(_) => "No response".to_string(),
        ProbeFailure::Connection(_) | ProbeFailure::Aborted(_) => "Connection error".to_string(),
        other => match other.status() {
            Some(status) => format!("Error {status}"),
            None => "Connection error".to_string(),
        },
    }
}
