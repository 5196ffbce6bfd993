//! CLI entrypoint for policy-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    CompositeTranscript, DeliberationProgress, NoProgress, RunDeliberationInput,
    RunDeliberationUseCase, TranscriptSink,
};
use council_domain::{OutputFormat, Proposal};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonlRoundLogger, OpenAiCompletionService, TranscriptFileWriter,
};
use council_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_overrides(&cli, &mut config);

    let _log_guard = init_tracing(cli.verbose, config.logging.directory.as_deref());
    info!("Starting policy-council");

    if !config.output.color {
        colored::control::set_override(false);
    }

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
        if !cli.quiet {
            eprintln!("{}", issue);
        }
    }
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    if !errors.is_empty() {
        for issue in &errors {
            eprintln!("{}", issue);
        }
        bail!("configuration has {} error(s)", errors.len());
    }

    let Some(text) = cli.proposal.clone() else {
        bail!("A proposal is required");
    };
    let proposal = Proposal::try_new(text)?;
    let roster = config.roster()?;
    let format = config.output.format.unwrap_or_default();

    // === Dependency Injection ===
    let service = Arc::new(OpenAiCompletionService::from_config(&config.provider)?);
    info!("Using {} at {}", service.model(), service.endpoint());

    let mut transcript = CompositeTranscript::new(Vec::new());
    if let Some(path) = &config.transcript.path {
        match TranscriptFileWriter::new(path) {
            Some(writer) => transcript.push(Arc::new(writer)),
            None => warn!("Continuing without transcript file {}", path.display()),
        }
    }
    if let Some(path) = &config.transcript.rounds_path {
        match JsonlRoundLogger::new(path) {
            Some(logger) => transcript.push(Arc::new(logger)),
            None => warn!("Continuing without round log {}", path.display()),
        }
    }

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping at the next phase boundary");
            ctrl_c_token.cancel();
        }
    });

    let transcript: Arc<dyn TranscriptSink> = Arc::new(transcript);
    let use_case = RunDeliberationUseCase::new(service)
        .with_transcript(transcript)
        .with_cancellation(token);

    let input = RunDeliberationInput::new(proposal, roster)
        .with_policy(config.policy())
        .with_params(config.params());

    let show_progress = !cli.quiet && format != OutputFormat::Json;
    if show_progress {
        println!();
        println!("+============================================================+");
        println!("|           Policy Council - Deliberation                    |");
        println!("+============================================================+");
        println!();
        println!("Proposal: {}", input.proposal);
        println!(
            "Council: {} (coordinator), {}",
            input.roster.coordinator().name(),
            input
                .roster
                .experts()
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    let progress = select_progress(show_progress, std::io::stdout().is_terminal());
    let outcome = use_case
        .execute_with_progress(input, progress.as_ref())
        .await
        .context("deliberation could not start")?;

    println!("{}", ConsoleFormatter.render(&outcome, format));

    Ok(())
}

/// Progress bars on a terminal, plain lines when piped, nothing when quiet
fn select_progress(show: bool, terminal: bool) -> Box<dyn DeliberationProgress> {
    match (show, terminal) {
        (false, _) => Box::new(NoProgress),
        (true, true) => Box::new(ProgressReporter::new()),
        (true, false) => Box::new(SimpleProgress),
    }
}

/// Command-line flags win over every configuration source
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(rounds) = cli.rounds {
        config.run.max_rounds = rounds;
    }
    if let Some(budget) = cli.budget {
        config.run.budget = budget;
    }
    if let Some(min_rounds) = cli.min_rounds {
        config.consensus.min_rounds = min_rounds;
    }
    if let Some(seed) = cli.seed {
        config.run.seed = Some(seed);
    }
    if cli.sequential {
        config.run.concurrent = false;
    }
    if let Some(path) = &cli.transcript {
        config.transcript.path = Some(path.clone());
    }
    if let Some(path) = &cli.rounds_log {
        config.transcript.rounds_path = Some(path.clone());
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
}

/// Install the stderr subscriber, plus a daily log file when configured.
///
/// `RUST_LOG` takes precedence over the `-v` count. The returned guard
/// must live until exit so buffered file output is flushed.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "policy-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}
