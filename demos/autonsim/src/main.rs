//! `autonsim` — command-line driver for the auton simulation kernel.
//!
//! Generates one environment, optionally seeds it from an exported event
//! log, runs it on the session's worker thread and writes the external event
//! log (plus a status log) to `--out`.
//!
//! ```text
//! autonsim -c run   -s 4 -l 20 -L 6 -t 1.5 --out output/mixed
//! autonsim -c run-L -L 16 -f chorus -t 2
//! autonsim -c run-l -l 25 --initial-events output/mixed/external_events.csv
//! autonsim -c gen   -w 1000 -h 800 -l 10
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use auton_core::Tmu;
use auton_events::load_initial_events_csv;
use auton_output::{CsvWriter, StatusOutputObserver};
use auton_session::{EnvironmentConfig, Layout, Session};
use auton_sim::{LogObserver, PositionSnapshot, RunSummary, SimObserver, StatusSnapshot};

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Generate a scattered environment and run it.
    #[value(name = "run")]
    Run,
    /// Generate an environment and report agent placement only.
    #[value(name = "gen")]
    Gen,
    /// Scripted agents on a square lattice, then run.
    #[value(name = "run-L")]
    RunSquare,
    /// Listeners on a square lattice, then run.
    #[value(name = "run-l")]
    RunListenerSquare,
}

/// Run an auton environment from the command line.
#[derive(Parser, Debug)]
#[command(name = "autonsim", version, disable_help_flag = true)]
struct Args {
    /// What to do.
    #[arg(short = 'c', long, value_enum, default_value = "run")]
    command: Command,

    /// Listener count.
    #[arg(short = 'l', long)]
    listeners: Option<u32>,

    /// Screamer count.
    #[arg(short = 's', long)]
    screamers: Option<u32>,

    /// Scripted agent count.
    #[arg(short = 'L', long)]
    scripted: Option<u32>,

    /// Behavior script driving scripted agents.
    #[arg(short = 'f', long)]
    script: Option<String>,

    /// Ticks per macro step.
    #[arg(short = 'm', long)]
    macro_factor: Option<u64>,

    /// Seconds per tick.
    #[arg(short = 'r', long)]
    time_resolution: Option<f64>,

    /// Area width in metres.
    #[arg(short = 'w', long)]
    width: Option<f64>,

    /// Area height in metres.
    #[arg(short = 'h', long)]
    height: Option<f64>,

    /// Number of Nestenes.
    #[arg(short = 'n', long)]
    nestenes: Option<u32>,

    /// Simulated seconds to run.
    #[arg(short = 't', long = "time", default_value_t = 1.0)]
    time: f64,

    #[arg(long)]
    seed: Option<u64>,

    /// TOML environment file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exported event log whose initialization rows seed the run.
    #[arg(long)]
    initial_events: Option<PathBuf>,

    /// Directory for `external_events.csv` and `status.csv`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    fn environment(&self) -> Result<EnvironmentConfig> {
        let mut config = match &self.config {
            Some(path) => EnvironmentConfig::load_toml(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => EnvironmentConfig::default(),
        };

        if let Some(v) = self.listeners       { config.listeners = v; }
        if let Some(v) = self.screamers       { config.screamers = v; }
        if let Some(v) = self.scripted        { config.scripted = v; }
        if let Some(v) = &self.script         { config.script = v.clone(); }
        if let Some(v) = self.macro_factor    { config.macro_factor = v; }
        if let Some(v) = self.time_resolution { config.time_resolution = v; }
        if let Some(v) = self.width           { config.width = v; }
        if let Some(v) = self.height          { config.height = v; }
        if let Some(v) = self.nestenes        { config.nestenes = v; }
        if let Some(v) = self.seed            { config.seed = v; }

        match self.command {
            Command::RunSquare         => config.layout = Layout::Square,
            Command::RunListenerSquare => config.layout = Layout::SquareListener,
            Command::Run | Command::Gen => {}
        }
        Ok(config)
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs progress and, with `--out`, writes `status.csv`.
struct CliObserver {
    log:    LogObserver,
    status: Option<StatusOutputObserver<CsvWriter>>,
}

impl SimObserver for CliObserver {
    fn on_status(&mut self, status: &StatusSnapshot) {
        self.log.on_status(status);
        if let Some(s) = &mut self.status {
            s.on_status(status);
        }
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.log.on_run_end(summary);
        if let Some(s) = &mut self.status {
            s.on_run_end(summary);
        }
    }
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn print_placement(p: &PositionSnapshot) {
    println!("Area: {} x {} m, {} agents", p.width, p.height, p.total());
    for (label, list) in [("screamers", &p.screamers), ("listeners", &p.listeners), ("scripted", &p.scripted)] {
        if list.is_empty() {
            continue;
        }
        println!("  {label:<10} {:>6}", list.len());
    }
}

fn print_summary(summary: &RunSummary, secs_per_tick: f64) {
    let simulated = summary.final_tmu.0 as f64 * secs_per_tick;
    println!();
    println!("{:<20} {:?}", "Outcome", summary.outcome);
    println!("{:<20} {} / {} ({simulated:.4} s)", "Final tmu", summary.final_tmu.0, summary.iterations);
    println!("{:<20} {}", "Macro steps", summary.counters.macro_steps);
    println!("{:<20} {}", "Micro steps", summary.counters.micro_steps);
    println!("{:<20} {}", "Events initiated", summary.counters.events_initiated);
    println!("{:<20} {}", "Events delivered", summary.counters.events_delivered);
    println!("{:<20} {}", "External events", summary.queue.external);
    println!("{:<20} {:.3} s", "Wall time", summary.wall_time.as_secs_f64());
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = args.environment()?;

    // 1. Environment.
    let mut session = Session::new();
    session
        .generate_environment(&config)
        .with_context(|| format!("generating {} environment", config.layout))?;
    print_placement(&session.retrieve_positions()?);

    if args.command == Command::Gen {
        return Ok(());
    }

    // 2. Seed stimuli.
    if let Some(path) = &args.initial_events {
        let events = load_initial_events_csv(path)
            .with_context(|| format!("reading initial events from {}", path.display()))?;
        let n = session.inject_initial_events(&events)?;
        let last = events.iter().map(|e| e.tmu).max().unwrap_or(Tmu::ZERO);
        println!("Injected {n} initial events (last at tmu {})", last.0);
    }

    // 3. Run.
    let status = match &args.out {
        Some(dir) => Some(StatusOutputObserver::new(CsvWriter::new(dir)?)),
        None => None,
    };
    let observer = CliObserver { log: LogObserver, status };

    let t0 = Instant::now();
    session.run_simulation(args.time, Box::new(observer))?;
    let summary = session.wait()?;
    tracing::debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "worker joined");
    print_summary(&summary, config.time_resolution);

    // 4. Export.
    if let Some(dir) = &args.out {
        let rows = session.export_external_events(dir)?;
        println!("{:<20} {rows} rows -> {}", "Exported", dir.display());
    }

    session.teardown();
    Ok(())
}
