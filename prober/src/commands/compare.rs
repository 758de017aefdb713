//! Side-by-side changelog output from the comparison catalogue

use std::path::PathBuf;
use std::time::Instant;

use shared::{ProbeResult, ProbeTask, COMPARISON_MODELS};
use crate::commands::ProbeContext;
use crate::error::ProberResult;
use crate::services::probe_runner::sort_results;
use crate::services::result_store::comparison_text;
use crate::types::{ProbeProfile, Style};

#[derive(Debug, Clone)]
pub struct ComparisonReport {
    /// Sorted by model name
    pub results: Vec<ProbeResult>,
    pub saved_to: Option<PathBuf>,
}

pub async fn run(ctx: &mut ProbeContext) -> ProberResult<ComparisonReport> {
    let key = match ctx.require_key() {
        Ok(key) => key,
        Err(e) => {
            ctx.say(Style::Error, &format!("❌ {e}"));
            return Err(e);
        }
    };

    ctx.say(Style::Title, "🧪 Testing Gemini Models for Changelog Generation (Parallel)");
    ctx.say(Style::Dim, &"=".repeat(65));
    ctx.say(Style::Highlight, &format!("🚀 Running {} models in parallel...", COMPARISON_MODELS.len()));
    ctx.blank();

    let tasks = COMPARISON_MODELS
        .iter()
        .map(|model| ProbeTask::for_model(model, &key))
        .collect();

    let started = Instant::now();
    let mut results = ctx.runner(ProbeProfile::comparison()).run(tasks, true).await;
    sort_results(&mut results);

    ctx.blank();
    ctx.say(
        Style::Success,
        &format!("🏁 {} models finished in {:.1}s", results.len(), started.elapsed().as_secs_f64()),
    );
    ctx.say_batch_summary(&results);
    ctx.blank();

    ctx.say(Style::Heading, "📊 RESULTS COMPARISON");
    ctx.say(Style::Dim, &"=".repeat(60));
    for result in &results {
        ctx.blank();
        ctx.say(Style::Title, &format!("🤖 {}:", result.model));
        ctx.say(Style::Dim, &"-".repeat(40));
        let style = if result.success { Style::Plain } else { Style::Error };
        ctx.say(style, &comparison_text(result));
        ctx.blank();
    }

    let saved_to = match ctx.store.save_comparison(&results).await {
        Ok(path) => {
            ctx.say(Style::Success, &format!("💾 Results saved to: {}", path.display()));
            Some(path)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not save comparison");
            ctx.say(Style::Warning, &format!("⚠️  Could not save results: {e}"));
            None
        }
    };

    Ok(ComparisonReport { results, saved_to })
}
