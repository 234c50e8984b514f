use anyhow::{Context, Result};
use aquaview_core::session::Session;
use aquaview_core::store::SettingsStore;
use aquaview_schemas::settings::MIN_REFRESH_INTERVAL_MS;
use clap::Parser;
use colored::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::analyst::AnalystClient;
use crate::config::{AnalystArgs, Cli, Command, ExportFormat, SetArgs, SettingsAction};

mod analyst;
mod config;
mod display;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run { ticks, seed } => run_dashboard(&cli.settings, ticks, seed).await,
        Command::Analyze(args) => analyze(&cli.settings, &args).await,
        Command::Report(args) => report(&cli.settings, &args).await,
        Command::Settings { action } => match action {
            SettingsAction::Show => print_settings(&cli.settings),
            SettingsAction::Set(args) => set_settings(&cli.settings, &args),
        },
        Command::Export { format } => export(format),
    }
}

/// Runtime controls accepted on stdin while the dashboard runs.
#[derive(Debug, PartialEq, Eq)]
enum RunCommand {
    TogglePause,
    SetInterval(u64),
    Quit,
    Help,
    Noop,
}

fn parse_run_command(line: &str) -> RunCommand {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => RunCommand::Noop,
        Some("p") | Some("pause") | Some("resume") => RunCommand::TogglePause,
        Some("i") | Some("interval") => match parts.next().and_then(|v| v.parse().ok()) {
            Some(ms) => RunCommand::SetInterval(ms),
            None => RunCommand::Help,
        },
        Some("q") | Some("quit") => RunCommand::Quit,
        Some(_) => RunCommand::Help,
    }
}

async fn run_dashboard(settings_path: &Path, ticks: Option<u64>, seed: Option<u64>) -> Result<()> {
    let store = SettingsStore::open(settings_path);
    let mut builder = Session::builder()
        .with_store(store)
        .with_sink(Arc::new(display::ToastSink));
    if let Some(seed) = seed {
        builder = builder.with_rng_seed(seed);
    }
    let mut session = builder.build().context("failed to start monitoring session")?;

    display::welcome();
    println!(
        "Controls: {} pause/resume, {} set tick period, {} quit",
        "p".yellow(),
        "i <ms>".yellow(),
        "q".yellow()
    );

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut rendered = 0u64;
    loop {
        let interval_ms = session.settings().refresh_interval_ms;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = input.next_line() => {
                let Ok(Some(line)) = line else { break };
                match parse_run_command(&line) {
                    RunCommand::TogglePause => {
                        if session.is_running() {
                            session.stop();
                            println!("{}", "Monitoring paused. 'p' to resume.".yellow());
                        } else {
                            session.start().context("failed to resume monitoring")?;
                            println!("{}", "Monitoring resumed.".green());
                        }
                    }
                    RunCommand::SetInterval(ms) => match session.set_refresh_interval(ms) {
                        Ok(settings) => println!(
                            "Tick period is now {} ms.",
                            settings.refresh_interval_ms
                        ),
                        Err(e) => eprintln!("{} {}", "Not applied:".red(), e),
                    },
                    RunCommand::Quit => break,
                    RunCommand::Help => println!(
                        "Commands: 'p' pause/resume, 'i <ms>' tick period (>= {} ms), 'q' quit",
                        MIN_REFRESH_INTERVAL_MS
                    ),
                    RunCommand::Noop => {}
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(interval_ms)), if session.is_running() => {
                let settings = session.settings();
                let history = session.history();
                if let Some(sample) = session.current_sample() {
                    display::dashboard(&sample, &settings, &history);
                }
                rendered += 1;
                if ticks.is_some_and(|limit| rendered >= limit) {
                    break;
                }
            }
        }
    }

    session.stop();
    Ok(())
}

/// Snapshot session for the one-shot analyst commands: backfilled history,
/// timer never armed.
fn snapshot_session(settings_path: &Path) -> Result<Session> {
    Session::builder()
        .with_store(SettingsStore::open(settings_path))
        .paused()
        .build()
        .context("failed to build session snapshot")
}

async fn analyze(settings_path: &Path, args: &AnalystArgs) -> Result<()> {
    let session = snapshot_session(settings_path)?;
    let sample = session
        .current_sample()
        .context("no current sample to analyze")?;
    let settings = session.settings();

    println!("Consulting analyst about the current reading...");
    let client = AnalystClient::new(args)?;
    let verdict = client.analyze(&sample, &settings).await?;
    display::analysis(&verdict);
    Ok(())
}

async fn report(settings_path: &Path, args: &AnalystArgs) -> Result<()> {
    let session = snapshot_session(settings_path)?;
    let history = session.recent(10);
    let settings = session.settings();

    println!("Generating report over the last {} samples...", history.len());
    let client = AnalystClient::new(args)?;
    let report = client.report(&history, &settings).await?;
    println!("\n{}", report);
    Ok(())
}

fn print_settings(settings_path: &Path) -> Result<()> {
    let store = SettingsStore::open(settings_path);
    let json = serde_json::to_string_pretty(store.settings())?;
    println!("{}", json);
    Ok(())
}

/// Apply threshold/unit/interval edits and persist them.
fn set_settings(settings_path: &Path, args: &SetArgs) -> Result<()> {
    if args
        .refresh_interval
        .is_some_and(|ms| ms < MIN_REFRESH_INTERVAL_MS)
    {
        eprintln!(
            "{} refresh interval below the {} ms minimum is not applied.",
            "Note:".yellow(),
            MIN_REFRESH_INTERVAL_MS
        );
    }
    let mut store = SettingsStore::open(settings_path);
    let updated = store.update(args.to_patch());
    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

// Export stays mocked: the dashboard advertises CSV/PDF export but no file
// is produced.
fn export(format: ExportFormat) -> Result<()> {
    let format = match format {
        ExportFormat::Csv => "CSV",
        ExportFormat::Pdf => "PDF",
    };
    log::info!("{} export requested", format);
    println!("{} export is mocked in this build; no file was written.", format);
    Ok(())
}
