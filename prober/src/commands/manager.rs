//! Interactive front end running the other commands in-process

use std::fmt;

use crate::commands::models::ModelsMode;
use crate::commands::{compare, debug, keys, models, ProbeContext};
use crate::error::ProberResult;
use crate::services::console::{banner, confirm};
use crate::types::Style;

/// A command reachable from the manager menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Keys,
    Debug,
    Models,
    Compare,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Keys, Tool::Debug, Tool::Models, Tool::Compare];

    pub fn title(&self) -> &'static str {
        match self {
            Tool::Keys => "🧪 Quick Key Validation",
            Tool::Debug => "🔍 Debug API Issues",
            Tool::Models => "🎯 Model Testing Suite",
            Tool::Compare => "📊 Model Comparison",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::Keys => "Fast validation of all API keys in the config file",
            Tool::Debug => "Detailed debugging tool for API connection problems",
            Tool::Models => "Changelog generation with the default model",
            Tool::Compare => "Compare all available Gemini models for changelog generation",
        }
    }

    fn from_choice(choice: &str) -> Option<Tool> {
        match choice {
            "1" => Some(Tool::Keys),
            "2" => Some(Tool::Debug),
            "3" => Some(Tool::Models),
            "4" => Some(Tool::Compare),
            _ => None,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tool::Keys => "keys",
            Tool::Debug => "debug",
            Tool::Models => "models",
            Tool::Compare => "compare",
        };
        write!(f, "{name}")
    }
}

/// Environment problems that stop the manager from starting
pub fn check_environment(ctx: &ProbeContext) -> Vec<String> {
    let mut issues = Vec::new();
    if !ctx.config_exists() {
        issues.push(format!("❌ Config file not found: {}", ctx.config_path.display()));
    }
    issues
}

pub async fn run(ctx: &mut ProbeContext) -> ProberResult<()> {
    let issues = check_environment(ctx);
    if !issues.is_empty() {
        ctx.say(Style::Heading, "⚠️  Environment Issues Detected:");
        for issue in &issues {
            ctx.say(Style::Error, &format!("   {issue}"));
        }
        ctx.blank();
        ctx.say(Style::Warning, "Please fix the environment issues before continuing.");
        return Ok(());
    }
    ctx.say(Style::Success, "✅ Environment check passed");

    loop {
        banner(ctx.sink.as_ref(), "🤖 Gemini Scripts Manager - Interactive Tool Suite");
        show_menu(ctx);

        let Some(choice) = ctx.ask("Select option (0-5): ") else {
            ctx.say(Style::Warning, "👋 Goodbye!");
            break;
        };
        ctx.blank();

        match choice.as_str() {
            "0" => {
                ctx.say(Style::Warning, "👋 Goodbye!");
                break;
            }
            "5" => {
                run_all(ctx).await;
            }
            other => match Tool::from_choice(other) {
                Some(tool) => {
                    run_tool(ctx, tool).await;
                }
                None => ctx.say(Style::Error, "❌ Invalid option. Please select 0-5."),
            },
        }

        ctx.blank();
        if ctx.ask("Press Enter to continue...").is_none() {
            break;
        }
        ctx.say(Style::Dim, &format!("\n{}\n", "=".repeat(80)));
    }
    Ok(())
}

fn show_menu(ctx: &ProbeContext) {
    ctx.say(Style::Heading, "📋 Available Tools:");
    ctx.blank();
    for (i, tool) in Tool::ALL.iter().enumerate() {
        ctx.say(Style::Plain, &format!("  [{}] {}", i + 1, tool.title()));
        ctx.say(Style::Dim, &format!("      {}", tool.description()));
        ctx.blank();
    }
    ctx.say(Style::Highlight, "  [5] 🚀 Run All Tools");
    ctx.say(Style::Dim, "      Execute all tools in sequence");
    ctx.blank();
    ctx.say(Style::Dim, "  [0] 👋 Exit");
    ctx.blank();
}

/// Run one tool, reporting whether it completed
pub async fn run_tool(ctx: &mut ProbeContext, tool: Tool) -> bool {
    ctx.say(Style::Info, &format!("🚀 Running: {tool}"));
    ctx.say(Style::Dim, &format!("   {}", tool.description()));
    ctx.say(Style::Dim, &"─".repeat(60));
    ctx.blank();

    let outcome = match tool {
        Tool::Keys => keys::run(ctx).await.map(|_| ()),
        Tool::Debug => debug::run(ctx).await.map(|_| ()),
        Tool::Models => models::run(ctx, ModelsMode::Default).await.map(|_| ()),
        Tool::Compare => compare::run(ctx).await.map(|_| ()),
    };

    ctx.blank();
    ctx.say(Style::Dim, &"─".repeat(60));
    match outcome {
        Ok(()) => {
            ctx.say(Style::Success, &format!("✅ {tool} completed successfully"));
            true
        }
        Err(e) => {
            tracing::warn!(tool = %tool, error = %e, "tool failed");
            ctx.say(Style::Error, &format!("❌ {tool} failed: {e}"));
            false
        }
    }
}

/// Run every tool in order, offering to stop after a failure
pub async fn run_all(ctx: &mut ProbeContext) -> Vec<(Tool, bool)> {
    ctx.say(Style::Highlight, "🚀 Running All Gemini Tools");
    ctx.say(Style::Title, &"═".repeat(40));
    ctx.blank();

    let mut results = Vec::new();
    for tool in Tool::ALL {
        let success = run_tool(ctx, tool).await;
        results.push((tool, success));
        if !success {
            ctx.blank();
            if !confirm(ctx.prompter.as_ref(), "Continue with remaining tools? (Y/n): ", true) {
                break;
            }
        }
        ctx.blank();
        ctx.say(Style::Dim, &"═".repeat(60));
        ctx.blank();
    }

    ctx.say(Style::Heading, "📊 Execution Summary:");
    ctx.say(Style::Info, &"─".repeat(25));
    for (tool, success) in &results {
        if *success {
            ctx.say(Style::Success, &format!("  {:<25} ✅ Success", tool.to_string()));
        } else {
            ctx.say(Style::Error, &format!("  {:<25} ❌ Failed", tool.to_string()));
        }
    }

    let successful = results.iter().filter(|(_, success)| *success).count();
    let style = if successful == results.len() { Style::Success } else { Style::Warning };
    ctx.blank();
    ctx.say(
        style,
        &format!("Total: {}/{} tools completed successfully", successful, results.len()),
    );
    results
}
