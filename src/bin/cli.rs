//! logdex CLI
//!
//! One-shot operations and inspection of a logdex data directory.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logdex::log::{LogReader, LogRecovery};
use logdex::protocol::Response;
use logdex::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// logdex CLI
#[derive(Parser, Debug)]
#[command(name = "logdex-cli")]
#[command(about = "CLI for the logdex secondary-index store")]
struct Args {
    /// Data directory holding storage.db
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the values stored under a key
    Find {
        /// The key to look up
        key: String,
    },

    /// Add a value to a key
    Insert {
        /// The key
        key: String,

        /// The value to add
        #[arg(allow_hyphen_values = true)]
        value: i32,
    },

    /// Remove a value from a key
    Delete {
        /// The key
        key: String,

        /// The value to remove
        #[arg(allow_hyphen_values = true)]
        value: i32,
    },

    /// Scan the log and report its health without modifying it
    Verify,

    /// Print every decodable record with its offset
    Dump,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> logdex::Result<()> {
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .create_if_missing(matches!(args.command, Commands::Insert { .. }))
        .build();

    match args.command {
        Commands::Find { key } => {
            println!("{}", find(config, key.as_bytes())?);
        }
        Commands::Insert { key, value } => {
            let mut engine = Engine::open(config)?;
            engine.insert(key.as_bytes(), value)?;
            engine.close()?;
        }
        Commands::Delete { key, value } => {
            let mut engine = Engine::open(config)?;
            engine.remove(key.as_bytes(), value)?;
            engine.close()?;
        }
        Commands::Verify => {
            let result = LogRecovery::verify(&config.log_path())?;
            println!("records:     {}", result.records_scanned);
            println!("live:        {}", result.live_records);
            println!("tombstoned:  {}", result.tombstoned_records);
            println!("duplicates:  {}", result.duplicates_collapsed);
            println!("valid bytes: {}", result.valid_len);
            println!("tail bytes:  {}", result.trailing_bytes);
            if result.was_truncated() {
                println!("status:      undecodable tail ignored");
            } else {
                println!("status:      clean");
            }
        }
        Commands::Dump => {
            let file = File::open(config.log_path())?;
            let len = file.metadata()?.len();
            let mut reader = LogReader::new(BufReader::new(file), len);
            while let Some((offset, record)) = reader.next_record()? {
                println!(
                    "{:>10}  {:<4}  {}  {}",
                    offset,
                    if record.tombstone { "dead" } else { "live" },
                    String::from_utf8_lossy(&record.key),
                    record.value
                );
            }
            if reader.trailing_bytes() > 0 {
                println!("{:>10}  <{} undecodable bytes>", reader.position(), reader.trailing_bytes());
            }
        }
    }

    Ok(())
}

/// Look up `key` without creating anything; a missing log holds no values
fn find(config: Config, key: &[u8]) -> logdex::Result<Response> {
    if !config.log_path().exists() {
        return Ok(Response::Null);
    }
    let engine = Engine::open(config)?;
    Ok(Response::from_values(engine.find(key)))
}
