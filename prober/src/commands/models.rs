//! Run the changelog prompt against one or more models

use shared::{ProbeResult, ProbeTask, DEFAULT_MODEL, GEMINI_MODEL, TEST_MODELS};
use crate::commands::ProbeContext;
use crate::core::utils::{format_duration, parse_selection};
use crate::error::{ProberError, ProberResult};
use crate::services::console::banner;
use crate::services::result_store::failure_summary;
use crate::types::{ProbeProfile, Style};

/// How the models command picks what to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelsMode {
    /// The configured default model, or the fallback
    Default,
    /// Every catalogue model
    All { parallel: bool },
    Interactive,
}

impl ModelsMode {
    /// Mode selected by the command-line flags; `-s` wins over `-p`
    pub fn from_flags(interactive: bool, all: bool, _parallel: bool, sequential: bool) -> Self {
        if interactive {
            ModelsMode::Interactive
        } else if all {
            ModelsMode::All { parallel: !sequential }
        } else {
            ModelsMode::Default
        }
    }
}

pub async fn run(ctx: &mut ProbeContext, mode: ModelsMode) -> ProberResult<Vec<ProbeResult>> {
    let key = match ctx.require_key() {
        Ok(key) => key,
        Err(e) => {
            ctx.say(Style::Error, &format!("❌ {e}"));
            return Err(e);
        }
    };

    match mode {
        ModelsMode::Interactive => interactive_menu(ctx, &key).await,
        ModelsMode::All { parallel } => {
            if parallel {
                ctx.say(Style::Success, &format!("🌟 Running all {} models in parallel", TEST_MODELS.len()));
            } else {
                ctx.say(Style::Success, &format!("🐌 Running all {} models sequentially", TEST_MODELS.len()));
            }
            Ok(run_test(ctx, &catalogue(), &key, parallel).await)
        }
        ModelsMode::Default => {
            let model = match ctx.default_model() {
                Some(model) => model.to_string(),
                None => {
                    ctx.say(
                        Style::Warning,
                        &format!("⚠️  {GEMINI_MODEL} not set in config. Using {DEFAULT_MODEL} as default."),
                    );
                    DEFAULT_MODEL.to_string()
                }
            };
            ctx.say(Style::Success, &format!("🚀 Running model: {model}"));
            Ok(run_test(ctx, &[model], &key, false).await)
        }
    }
}

fn catalogue() -> Vec<String> {
    TEST_MODELS.iter().map(|model| model.to_string()).collect()
}

/// Probe `models`, then print and store every result
pub async fn run_test(ctx: &ProbeContext, models: &[String], key: &str, parallel: bool) -> Vec<ProbeResult> {
    let runner = ctx.runner(ProbeProfile::changelog());
    let tasks: Vec<ProbeTask> = models.iter().map(|model| ProbeTask::for_model(model, key)).collect();

    let results = if parallel && tasks.len() > 1 {
        ctx.say(Style::Highlight, &format!("🚀 Running {} models in parallel...", tasks.len()));
        ctx.blank();
        let started = std::time::Instant::now();
        let results = runner.run_parallel(tasks).await;
        ctx.blank();
        ctx.say(
            Style::Success,
            &format!("🏁 {} models finished in {:.1}s", results.len(), started.elapsed().as_secs_f64()),
        );
        ctx.blank();
        for result in &results {
            report(ctx, result).await;
        }
        results
    } else {
        let mut results = Vec::with_capacity(tasks.len());
        for task in &tasks {
            ctx.say(Style::Info, &format!("🧪 Testing {}...", task.model));
            let result = runner.probe(task).await;
            report(ctx, &result).await;
            results.push(result);
        }
        results
    };

    if results.len() > 1 {
        ctx.say_batch_summary(&results);
        ctx.blank();
    }
    results
}

async fn report(ctx: &ProbeContext, result: &ProbeResult) {
    print_result(ctx, result);
    match ctx.store.save_model_output(result).await {
        Ok(path) => ctx.say(Style::Success, &format!("💾 Saved to: {}", path.display())),
        Err(e) => {
            tracing::warn!(model = %result.model, error = %e, "could not save model output");
            ctx.say(Style::Warning, &format!("⚠️  Could not save output: {e}"));
        }
    }
    ctx.blank();
}

pub fn print_result(ctx: &ProbeContext, result: &ProbeResult) {
    let rule = "─".repeat(50);
    ctx.say(Style::Title, &format!("🤖 {} TEST", result.model.to_uppercase()));
    if result.success {
        let usage = result.usage.unwrap_or_default();
        ctx.say(Style::Info, &format!("📊 Input: {} tokens", usage.input_tokens));
        ctx.say(Style::Info, &format!("📤 Output: {} tokens", usage.output_tokens));
    }
    ctx.say(Style::Warning, &format!("⏱️  Duration: {}", format_duration(result.elapsed)));
    ctx.say(Style::Dim, &rule);
    match &result.failure {
        None => ctx.say(Style::Plain, result.text.as_deref().unwrap_or_default()),
        Some(failure) => ctx.say(Style::Error, &format!("❌ ERROR: {}", failure_summary(failure))),
    }
    ctx.say(Style::Dim, &rule);
    ctx.blank();
}

async fn interactive_menu(ctx: &mut ProbeContext, key: &str) -> ProberResult<Vec<ProbeResult>> {
    let mut all_results = Vec::new();

    loop {
        banner(ctx.sink.as_ref(), "🤖 Gemini Model Testing Suite");
        ctx.say(Style::Heading, "📋 Available Options:");
        ctx.say(Style::Plain, "  [1] 🚀 Run default model");
        ctx.say(Style::Plain, "  [2] 👁️  View current default model");
        ctx.say(Style::Plain, "  [3] ⚙️  Update default model");
        ctx.say(Style::Plain, "  [4] 🎯 Run test with specific model(s)");
        ctx.say(Style::Plain, "  [5] 🌟 Run tests with all models (parallel)");
        ctx.say(Style::Plain, "  [6] 🐌 Run tests with all models (sequential)");
        ctx.say(Style::Dim, "  [0] 👋 Exit");
        ctx.blank();

        let Some(choice) = ctx.ask("Select option: ") else {
            ctx.say(Style::Warning, "👋 Goodbye!");
            break;
        };

        match choice.as_str() {
            "0" => {
                ctx.say(Style::Warning, "👋 Goodbye!");
                break;
            }
            "1" => match ctx.default_model().map(str::to_string) {
                None => ctx.say(Style::Error, "❌ No default model set. Use option [3] to set one."),
                Some(model) => {
                    ctx.say(Style::Success, &format!("🚀 Running default model: {model}"));
                    all_results.extend(run_test(ctx, &[model], key, true).await);
                }
            },
            "2" => match ctx.default_model() {
                None => ctx.say(Style::Warning, "⚠️  Current default model: Not set"),
                Some(model) => ctx.say(Style::Success, &format!("✅ Current default model: {model}")),
            },
            "3" => {
                if let Err(e) = update_default_model(ctx) {
                    ctx.say(Style::Error, &format!("❌ {e}"));
                }
            }
            "4" => match select_models(ctx) {
                Ok(selected) if selected.is_empty() => {}
                Ok(selected) => {
                    ctx.say(Style::Success, &format!("🎯 Running {} selected model(s)", selected.len()));
                    all_results.extend(run_test(ctx, &selected, key, true).await);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "model selection rejected");
                    ctx.say(Style::Error, "❌ Invalid input");
                }
            },
            "5" => {
                ctx.say(Style::Success, &format!("🌟 Running all {} models in parallel", TEST_MODELS.len()));
                all_results.extend(run_test(ctx, &catalogue(), key, true).await);
            }
            "6" => {
                ctx.say(Style::Success, &format!("🐌 Running all {} models sequentially", TEST_MODELS.len()));
                all_results.extend(run_test(ctx, &catalogue(), key, false).await);
            }
            _ => ctx.say(Style::Error, "❌ Invalid option"),
        }
    }

    Ok(all_results)
}

/// Pick a catalogue model and persist it as the default
pub fn update_default_model(ctx: &mut ProbeContext) -> ProberResult<Option<String>> {
    ctx.say(Style::Heading, "🎯 Available models:");
    for (i, model) in TEST_MODELS.iter().enumerate() {
        ctx.say(Style::Plain, &format!("  [{}] {}", i + 1, model));
    }

    loop {
        ctx.blank();
        let Some(choice) = ctx.ask(&format!("Select model (1-{}): ", TEST_MODELS.len())) else {
            ctx.say(Style::Error, "❌ Invalid input");
            return Ok(None);
        };
        let Ok(number) = choice.trim().parse::<usize>() else {
            ctx.say(Style::Error, "❌ Invalid input");
            return Ok(None);
        };
        if !(1..=TEST_MODELS.len()).contains(&number) {
            ctx.say(Style::Error, "❌ Invalid selection");
            continue;
        }

        let selected = TEST_MODELS[number - 1].to_string();
        let updated = ctx.config.merged_with(GEMINI_MODEL, selected.as_str());
        ctx.save_config(updated, None)?;
        tracing::info!(model = %selected, path = %ctx.config_path.display(), "updated default model");
        ctx.say(Style::Success, &format!("✅ Updated {GEMINI_MODEL} to: {selected}"));
        return Ok(Some(selected));
    }
}

/// Ask for space-separated catalogue numbers; empty input means all
pub fn select_models(ctx: &ProbeContext) -> ProberResult<Vec<String>> {
    ctx.say(Style::Heading, "🎯 Select models to test:");
    for (i, model) in TEST_MODELS.iter().enumerate() {
        ctx.say(Style::Plain, &format!("  [{}] {}", i + 1, model));
    }
    ctx.blank();
    ctx.say(Style::Info, "💡 Enter model numbers separated by spaces (e.g., 1 2):");
    ctx.say(Style::Dim, "   Or press Enter for all models");

    let choice = ctx.ask("Selection: ").unwrap_or_default();
    if choice.trim().is_empty() {
        return Ok(catalogue());
    }

    match parse_selection(&choice, TEST_MODELS.len()) {
        Some(indices) if !indices.is_empty() => Ok(indices.into_iter().map(|i| TEST_MODELS[i].to_string()).collect()),
        Some(_) => {
            ctx.say(Style::Error, "❌ No valid selections");
            Ok(Vec::new())
        }
        None => Err(ProberError::InvalidSelection { input: choice }),
    }
}
