//! Key creation guide, interactive key setup and key validation

use std::process::Command;

use shared::{KeySlot, ProbeResult, ProbeTask, DEFAULT_MODEL};
use crate::commands::ProbeContext;
use crate::core::outcome::helper_message;
use crate::core::utils::{mask_key, KEY_PREFIX};
use crate::error::ProberResult;
use crate::services::console::confirm;
use crate::types::{ProbeProfile, Style};

pub const AI_STUDIO_URL: &str = "https://aistudio.google.com/";
/// Header line written above saved keys
pub const KEYS_HEADER: &str = "Gemini API Keys";

pub async fn run(ctx: &mut ProbeContext) -> ProberResult<()> {
    loop {
        show_menu(ctx);
        let Some(choice) = ctx.ask("Select option (1-4): ") else {
            break;
        };
        ctx.blank();

        match choice.as_str() {
            "1" => guide_key_creation(ctx),
            "2" => {
                interactive_key_setup(ctx).await?;
            }
            "3" => {
                validate_existing_keys(ctx).await;
            }
            "4" => {
                ctx.say(Style::Info, "👋 Goodbye!");
                break;
            }
            _ => ctx.say(Style::Error, "❌ Invalid choice"),
        }

        ctx.blank();
        if ctx.ask("Press Enter to continue...").is_none() {
            break;
        }
        ctx.say(Style::Dim, &format!("\n{}\n", "=".repeat(50)));
    }
    Ok(())
}

fn show_menu(ctx: &ProbeContext) {
    ctx.say(Style::Title, "🔑 Gemini API Key Helper");
    ctx.say(Style::Dim, &"=".repeat(25));
    ctx.blank();
    ctx.say(Style::Plain, "1. Guide: How to create API keys");
    ctx.say(Style::Plain, "2. Interactive: Set up API keys");
    ctx.say(Style::Plain, "3. Validate: Test existing keys");
    ctx.say(Style::Plain, "4. Exit");
    ctx.blank();
}

pub fn guide_key_creation(ctx: &ProbeContext) {
    ctx.say(Style::Title, "🔑 Gemini API Key Creation Guide");
    ctx.say(Style::Dim, &"=".repeat(40));
    ctx.blank();

    ctx.say(Style::Info, "Step 1: Open Google AI Studio");
    ctx.say(Style::Plain, &format!("URL: {AI_STUDIO_URL}"));
    if confirm(ctx.prompter.as_ref(), "Open in browser? (y/N): ", false) {
        if open_browser(AI_STUDIO_URL) {
            ctx.say(Style::Success, "✅ Browser opened");
        } else {
            ctx.say(Style::Warning, "⚠️  Please open the URL manually");
        }
    }
    ctx.blank();

    ctx.say(Style::Info, "Step 2: Get API Key");
    ctx.say(Style::Plain, "1. Click 'Get API key' in the left sidebar");
    ctx.say(Style::Plain, "2. Click 'Create API key'");
    ctx.say(Style::Plain, "3. Select a Google Cloud project (or create new)");
    ctx.say(Style::Plain, "4. Copy the generated API key");
    ctx.say(Style::Plain, &format!("   - Should start with '{KEY_PREFIX}'"));
    ctx.say(Style::Plain, "   - Keep it secret!");
    ctx.blank();

    ctx.say(Style::Info, "Step 3: Enable APIs (if needed)");
    ctx.say(Style::Plain, "If you get permission errors:");
    ctx.say(Style::Plain, "1. Go to Google Cloud Console");
    ctx.say(Style::Plain, "2. Enable 'Generative Language API'");
    ctx.blank();

    let _ = ctx.ask("Press Enter when you have your API key...");
}

/// Hand `url` to the platform opener
fn open_browser(url: &str) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        Command::new("xdg-open")
    };

    command.arg(url);
    spawn_detached(command)
}

/// Start `command` without blocking; its exit status is collected on a
/// background thread so the process does not linger as a zombie
fn spawn_detached(mut command: Command) -> bool {
    match command.spawn() {
        Ok(mut child) => {
            std::thread::spawn(move || {
                if let Err(e) = child.wait() {
                    tracing::debug!(error = %e, "browser launcher did not exit cleanly");
                }
            });
            true
        }
        Err(e) => {
            tracing::debug!(error = %e, "could not launch browser");
            false
        }
    }
}

/// Probe a single key the way the helper does
pub async fn test_api_key(ctx: &ProbeContext, key: &str) -> ProbeResult {
    let task = ProbeTask::new("key-helper", DEFAULT_MODEL, key);
    ctx.runner(ProbeProfile::key_helper()).probe(&task).await
}

/// Walk through each key slot; returns whether the config file was written
pub async fn interactive_key_setup(ctx: &mut ProbeContext) -> ProberResult<bool> {
    ctx.say(Style::Title, "🔧 API Key Setup");
    ctx.say(Style::Dim, &"=".repeat(20));
    ctx.blank();

    ctx.say(Style::Plain, &format!("Current keys in {}:", ctx.config_path.display()));
    for slot in KeySlot::ALL {
        match ctx.config.get_non_empty(slot.config_key()) {
            Some(key) => ctx.say(Style::Plain, &format!("  {}: {}", slot.config_key(), mask_key(key))),
            None => ctx.say(Style::Plain, &format!("  {}: Not set", slot.config_key())),
        }
    }
    ctx.blank();

    let mut updated = ctx.config.clone();
    for slot in KeySlot::ALL {
        let name = slot.config_key();
        if let Some(current) = ctx.config.get_non_empty(name) {
            let question = format!("Update {name}? Current: {} (y/N): ", mask_key(current));
            if !confirm(ctx.prompter.as_ref(), &question, false) {
                continue;
            }
        }

        let new_key = ctx
            .ask(&format!("Enter {name} (or press Enter to skip): "))
            .unwrap_or_default();
        if new_key.is_empty() {
            ctx.blank();
            continue;
        }

        if !new_key.starts_with(KEY_PREFIX) {
            ctx.say(Style::Warning, &format!("⚠️  Warning: Key doesn't start with '{KEY_PREFIX}'"));
        }
        ctx.say(Style::Plain, "Testing key...");
        let result = test_api_key(ctx, &new_key).await;
        let message = helper_message(&result);
        if result.success {
            ctx.say(Style::Success, "✅ Valid!");
            ctx.say(Style::Plain, &format!("Response: {message}"));
            updated.insert(name, new_key);
        } else {
            ctx.say(Style::Error, &format!("❌ Invalid: {message}"));
            if confirm(ctx.prompter.as_ref(), "Save anyway? (y/N): ", false) {
                updated.insert(name, new_key);
            }
        }
        ctx.blank();
    }

    let question = format!("Save changes to {}? (Y/n): ", ctx.config_path.display());
    if !confirm(ctx.prompter.as_ref(), &question, true) {
        return Ok(false);
    }
    ctx.save_config(updated, Some(KEYS_HEADER))?;
    tracing::info!(path = %ctx.config_path.display(), "saved api keys");
    ctx.say(Style::Success, &format!("✅ Saved to {}", ctx.config_path.display()));
    Ok(true)
}

/// Probe every configured slot in order; unset slots map to `None`
pub async fn validate_existing_keys(ctx: &ProbeContext) -> Vec<(KeySlot, Option<ProbeResult>)> {
    ctx.say(Style::Title, "🧪 Validating Existing Keys");
    ctx.say(Style::Dim, &"=".repeat(30));
    ctx.blank();

    let mut outcomes = Vec::new();
    for slot in KeySlot::ALL {
        let name = slot.config_key();
        let Some(key) = ctx.config.get_non_empty(name) else {
            ctx.say(Style::Plain, &format!("{name}: Not set"));
            outcomes.push((slot, None));
            continue;
        };

        let result = test_api_key(ctx, key).await;
        let message = helper_message(&result);
        if result.success {
            ctx.say(Style::Success, &format!("{name} ({}): ✅ Valid - {message}", mask_key(key)));
        } else {
            ctx.say(Style::Error, &format!("{name} ({}): ❌ Invalid - {message}", mask_key(key)));
        }
        outcomes.push((slot, Some(result)));
    }
    outcomes
}
