//! logdex Command Driver
//!
//! Reads a command count and that many commands from stdin (or a file),
//! runs them against the store and prints `find` results to stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use logdex::config::LogSyncStrategy;
use logdex::driver::Session;
use logdex::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// logdex driver
#[derive(Parser, Debug)]
#[command(name = "logdex")]
#[command(about = "Persistent secondary-index store driven by text commands")]
#[command(version)]
struct Args {
    /// Data directory holding storage.db
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// fsync the log after every write
    #[arg(long)]
    fsync: bool,
}

fn main() {
    // Logs go to stderr; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,logdex=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("logdex v{}", logdex::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir.display());

    let sync_strategy = if args.fsync {
        LogSyncStrategy::EveryWrite
    } else {
        LogSyncStrategy::Flush
    };

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .sync_strategy(sync_strategy)
        .build();

    if let Err(e) = run(config, args.input) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: Config, input: Option<PathBuf>) -> logdex::Result<()> {
    let mut engine = Engine::open(config)?;

    let input: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let output = BufWriter::new(io::stdout().lock());

    let stats = Session::new(&mut engine, input, output).run()?;
    tracing::debug!(
        executed = stats.executed,
        skipped = stats.skipped,
        lines = stats.lines_written,
        "session finished"
    );

    engine.close()
}
