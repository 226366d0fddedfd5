//! ALPHABOX CLI
//!
//! Plays one game of ALPHABOX and replays it in the terminal.
//!
//! # Example
//!
//! ```bash
//! # Replay a full game, 20 ms per event
//! alphabox --interval-ms 20
//!
//! # Collect only STAR and PINKBEAN, burning only common letters
//! alphabox --words 0,2 --eligible common
//!
//! # Statistics over 1000 runs
//! alphabox --runs 1000 --words 0
//!
//! # Dump the event log
//! alphabox --json > run.json
//! ```

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alphabox::playback::{PlaybackController, TokioScheduler};
use alphabox::sim::{BatchStats, Catalog, EventLog, Rarity, RngSource, SimulationEngine};
use alphabox::{AppResult, PlaybackBus, RunOptions, TerminalPrinter};

/// ALPHABOX
///
/// Opens letter boxes until the chosen words are complete (or enough powder
/// has been synthesized to pay for the rest), then replays the run.
#[derive(Parser, Debug)]
#[command(name = "alphabox")]
#[command(version, about, long_about = None)]
struct Args {
    /// Catalog file (TOML). Defaults to the built-in five-word catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Comma-separated word indices to collect. Defaults to every word.
    #[arg(long, value_delimiter = ',')]
    words: Option<Vec<usize>>,

    /// Percent chance of an advanced box with each normal box (0-100)
    #[arg(long)]
    advanced_probability: Option<f64>,

    /// Comma-separated tiers allowed as synthesis fuel (rare, medium, common)
    #[arg(long, value_delimiter = ',')]
    eligible: Option<Vec<Rarity>>,

    /// Delay between replayed events, in milliseconds. 0 prints at once.
    #[arg(long, default_value = "50")]
    interval_ms: u64,

    /// Run this many games and print statistics instead of replaying one
    #[arg(long)]
    runs: Option<usize>,

    /// Print the event log as JSON instead of replaying it
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,alphabox=info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> AppResult<()> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::from_toml_file(path)?,
        None => Catalog::reference(),
    };
    let options = RunOptions {
        words: args.words,
        advanced_probability: args.advanced_probability,
        eligible: args.eligible,
    };
    let config = options.to_config(&catalog)?;
    let engine = SimulationEngine::new(catalog);
    let mut rng = RngSource::from_entropy();

    if let Some(runs) = args.runs {
        info!("Collecting statistics over {} runs", runs);
        let stats = BatchStats::collect(&engine, &config, runs, &mut rng)?;
        println!("{stats}");
        return Ok(());
    }

    let log = engine.run(&config, &mut rng)?;

    if args.json {
        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &log)?;
        writeln!(out)?;
        return Ok(());
    }

    replay(&engine, log, Duration::from_millis(args.interval_ms))
}

fn replay(engine: &SimulationEngine, log: EventLog, interval: Duration) -> AppResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;
    let scheduler = Arc::new(TokioScheduler::new(runtime.handle().clone()));

    let (presenter, receiver) = PlaybackBus::create_pair();
    let controller = PlaybackController::new(scheduler, presenter);
    let mut printer = TerminalPrinter::new(engine.catalog().words(), std::io::stdout().lock());

    controller.play(log, interval);
    while let Some(message) = receiver.recv() {
        if printer.handle(&message)? {
            break;
        }
    }

    printer.into_inner().flush()?;
    Ok(())
}
