//! Main entry point for the gemini-probe binary
//!
//! Wires the real client, result store and terminal seams into a
//! [`ProbeContext`] and dispatches the selected command.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use prober::commands::models::ModelsMode;
use prober::commands::{compare, debug, helper, keys, load_config, manager, models};
use prober::services::{ConsoleSink, RealGeminiClient, RealResultStore, StdinPrompter, DEFAULT_CONCURRENCY};
use prober::{OutputSink, ProbeContext, ProberError, ProberResult, Style};
use shared::logging;

/// Diagnostics for Gemini API keys and models
#[derive(Parser)]
#[command(name = "gemini-probe")]
#[command(about = "Validate Gemini API keys, debug failures and compare models")]
pub struct Args {
    /// Path of the KEY=VALUE config file
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Directory for model output dumps
    #[arg(long, global = true, default_value = "tmp")]
    pub output_dir: PathBuf,

    /// Maximum number of probes in flight
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Quick validation of every configured key
    Keys,
    /// Detailed diagnosis of the primary key
    Debug,
    /// Run the changelog prompt against models
    Models {
        /// Interactive menu mode
        #[arg(short, long)]
        interactive: bool,
        /// Run tests with all models
        #[arg(short, long)]
        all: bool,
        /// Run tests in parallel (default for --all)
        #[arg(short, long)]
        parallel: bool,
        /// Run tests sequentially
        #[arg(short, long)]
        sequential: bool,
    },
    /// Compare the comparison catalogue side by side
    Compare,
    /// Key creation guide and interactive key setup
    Helper,
    /// Interactive manager for all tools
    Menu,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Keys => "keys",
            Command::Debug => "debug",
            Command::Models { .. } => "models",
            Command::Compare => "compare",
            Command::Helper => "helper",
            Command::Menu => "menu",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init_tracing(args.log_level.as_deref());

    let command_name = args.command.name();
    logging::log_startup(command_name, &format!("{command_name} with config {}", args.env_file.display()));

    let sink: Arc<dyn OutputSink> = Arc::new(ConsoleSink::for_stdout());
    let built = build_context(&args, Arc::clone(&sink));
    let outcome = match built {
        Ok(mut ctx) => dispatch(&mut ctx, args.command).await,
        Err(e) => {
            sink.emit(Style::Error, &format!("❌ {e}"));
            Err(e)
        }
    };

    match outcome {
        Ok(()) => {
            logging::log_success(command_name, "finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_fatal() => {
            logging::log_error(command_name, "command", &e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            // Reported to the user already; not a process failure
            tracing::warn!(command = command_name, error = %e, "command stopped early");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_context(args: &Args, sink: Arc<dyn OutputSink>) -> ProberResult<ProbeContext> {
    let config = load_config(&args.env_file)?;
    let client = RealGeminiClient::from_config(&config)?;

    Ok(ProbeContext::new(
        config,
        args.env_file.clone(),
        Arc::new(client),
        Arc::new(RealResultStore::with_base_dir(args.output_dir.clone())),
        sink,
        Arc::new(StdinPrompter::for_stdout()),
    )
    .with_concurrency(args.concurrency))
}

async fn dispatch(ctx: &mut ProbeContext, command: Command) -> Result<(), ProberError> {
    match command {
        Command::Keys => keys::run(ctx).await.map(|_| ()),
        Command::Debug => debug::run(ctx).await.map(|_| ()),
        Command::Models { interactive, all, parallel, sequential } => {
            let mode = ModelsMode::from_flags(interactive, all, parallel, sequential);
            models::run(ctx, mode).await.map(|_| ())
        }
        Command::Compare => compare::run(ctx).await.map(|_| ()),
        Command::Helper => helper::run(ctx).await,
        Command::Menu => manager::run(ctx).await,
    }
}
