use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use upwatch::{
    ArpingProber, HistoryStore, Monitor, Policy, Prober, ReportMode, ReportWriter,
    SimulatedProber, SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "upwatch")]
#[command(about = "Monitors a host's reachability and records UP/DOWN transitions")]
struct Args {
    /// Target IP address to monitor
    #[arg(value_name = "IP")]
    target: String,

    /// Report file (a .txt extension selects the plain-text format)
    #[arg(short, long, default_value = "report.html", value_name = "FILE")]
    output: PathBuf,

    /// Log file (overwritten on every run)
    #[arg(short, long, default_value = "upwatch.log", value_name = "FILE")]
    logfile: PathBuf,

    /// Probe timeout in seconds
    #[arg(short, long, default_value = "3", value_name = "SECONDS")]
    timeout: u32,

    /// Show the full history rather than the last 20 events
    #[arg(short, long)]
    full_output: bool,

    /// Flap window in minutes: a DOWN reversed by an UP within this window
    /// is treated as probe noise and dropped from the history
    #[arg(long, default_value = "1", value_name = "MINUTES")]
    flap_window: u32,

    /// Directory where history snapshots are kept
    #[arg(long, default_value = ".", value_name = "DIR")]
    state_dir: PathBuf,

    /// Auto-refresh interval embedded in the HTML report, in seconds
    #[arg(long, default_value = "60", value_name = "SECONDS")]
    refresh: u32,

    /// Use a randomized stub prober instead of arping (testing only)
    #[arg(long)]
    simulate: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.logfile)?;
    tracing::info!(target = %args.target, "upwatch starting");

    let prober: Box<dyn Prober> = if args.simulate {
        Box::new(SimulatedProber::new(&args.target))
    } else {
        Box::new(ArpingProber::new(&args.target, args.timeout))
    };

    let policy = Policy {
        flap_window: chrono::Duration::minutes(args.flap_window.into()),
        ..Policy::default()
    };
    let mode = if args.full_output {
        ReportMode::Full
    } else {
        ReportMode::Tail
    };
    let store = HistoryStore::for_target(&args.state_dir, &args.target);
    let report = ReportWriter::new(&args.output, mode, args.refresh);

    let mut monitor = Monitor::start(prober, Box::new(SystemClock), store, report, policy)
        .context("could not load the history snapshot; move or delete it to start fresh")?;
    monitor.run()
}

/// Route all diagnostics to the log file, overwriting any previous run's log.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}
