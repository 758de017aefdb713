//! Quick validation of every configured key slot

use shared::{KeySlot, ProbeTask, DEFAULT_MODEL};
use crate::commands::ProbeContext;
use crate::core::outcome::KeyStatus;
use crate::core::utils::mask_key;
use crate::error::{ProberError, ProberResult};
use crate::services::probe_runner::sort_results;
use crate::types::{ProbeProfile, Style};

/// Verdict per slot, in slot order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    pub entries: Vec<(KeySlot, KeyStatus)>,
}

impl KeyReport {
    pub fn working(&self) -> usize {
        self.entries.iter().filter(|(_, status)| status.is_working()).count()
    }

    pub fn status(&self, slot: KeySlot) -> Option<&KeyStatus> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == slot)
            .map(|(_, status)| status)
    }
}

pub async fn run(ctx: &mut ProbeContext) -> ProberResult<KeyReport> {
    ctx.say(Style::Title, "🔍 Gemini API Key Validator");
    ctx.say(Style::Dim, &"=".repeat(50));
    ctx.blank();

    if !ctx.config_exists() {
        ctx.say(Style::Error, &format!("❌ Config file not found at: {}", ctx.config_path.display()));
        ctx.say(Style::Error, "❌ Failed to load config file. Exiting.");
        return Err(ProberError::ConfigFileMissing {
            path: ctx.config_path.display().to_string(),
        });
    }

    ctx.say(Style::Info, &format!("📁 Loading config from: {}", ctx.config_path.display()));
    for slot in KeySlot::ALL {
        if let Some(key) = ctx.config.get_non_empty(slot.config_key()) {
            ctx.say(Style::Success, &format!("✅ Loaded {}: {}", slot.config_key(), mask_key(key)));
        }
    }

    ctx.blank();
    ctx.say(Style::Heading, "🧪 Testing API Keys:");
    ctx.say(Style::Dim, &"-".repeat(30));

    let mut tasks = Vec::new();
    let mut entries = Vec::new();
    for slot in KeySlot::ALL {
        match ctx.config.get_non_empty(slot.config_key()) {
            Some(key) => {
                ctx.say(Style::Info, &format!("🔑 Testing {slot}..."));
                tasks.push(ProbeTask::new(slot.display_name(), DEFAULT_MODEL, key));
            }
            None => {
                ctx.say(Style::Error, &format!("❌ {slot}: {}", KeyStatus::NotConfigured));
                entries.push((slot, KeyStatus::NotConfigured));
            }
        }
    }

    let mut results = ctx.runner(ProbeProfile::key_check()).run(tasks, true).await;
    sort_results(&mut results);

    for result in &results {
        let Some(slot) = KeySlot::ALL.into_iter().find(|slot| slot.display_name() == result.task_id) else {
            continue;
        };
        let status = KeyStatus::from_result(result);
        ctx.say(Style::Plain, &format!("   {}: {}", slot.display_name(), status));
        entries.push((slot, status));
    }
    entries.sort_by_key(|(slot, _)| KeySlot::ALL.iter().position(|s| s == slot));

    let report = KeyReport { entries };

    ctx.blank();
    ctx.say(Style::Heading, "📊 Summary:");
    ctx.say(Style::Dim, &"-".repeat(20));
    for (slot, status) in &report.entries {
        if status.is_working() {
            ctx.say(Style::Success, &format!("✅ {}: {}", slot.display_name(), status));
        } else {
            ctx.say(Style::Error, &format!("❌ {}: {}", slot.display_name(), status));
        }
    }

    ctx.blank();
    let working = report.working();
    if working > 0 {
        ctx.say(
            Style::Success,
            &format!("🎉 {}/{} keys are working!", working, report.entries.len()),
        );
    } else {
        ctx.say(Style::Warning, "⚠️  No valid keys found. Check your config file.");
    }

    Ok(report)
}
