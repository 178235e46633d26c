//! TickDB Command-Line Interface
//!
//! A thin mapping of subcommands onto the TickDB library API.
//!
//! # Usage
//!
//! ```bash
//! # Insert a single tick
//! tickdb insert AAPL 1700000000 150.25 500
//!
//! # Query a time range
//! tickdb query AAPL 1700000000 1700003600
//!
//! # Show the last 20 ticks
//! tickdb last AAPL 20
//!
//! # Generate random ticks and measure throughput
//! tickdb benchmark AAPL --count 1000000
//!
//! # Import a CSV file (timestamp,price,volume)
//! tickdb import AAPL ticks.csv
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;
mod formatter;

use formatter::OutputFormat;

/// TickDB command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "tickdb",
    version,
    about = "Command-line interface for TickDB",
    long_about = "A command-line interface for TickDB, an embeddable append-only\n\
                  tick store. Each symbol lives in its own directory of\n\
                  memory-mapped column files under the data directory."
)]
struct Args {
    /// Data directory holding per-symbol column files
    #[arg(short = 'D', long, default_value = "./data", env = "TICKDB_DATA_DIR")]
    data_dir: PathBuf,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormatArg,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert a single tick
    Insert {
        /// Symbol to insert into
        symbol: String,
        /// Tick timestamp
        timestamp: u64,
        /// Trade price
        price: f64,
        /// Trade volume
        volume: u64,
    },
    /// Query ticks within a timestamp range (inclusive)
    Query {
        /// Symbol to query
        symbol: String,
        /// Start timestamp
        start: u64,
        /// End timestamp
        end: u64,
    },
    /// Show the most recent ticks in insertion order
    Last {
        /// Symbol to query
        symbol: String,
        /// Number of ticks to show
        #[arg(default_value_t = 10)]
        count: usize,
    },
    /// Generate random ticks and measure append throughput
    Benchmark {
        /// Symbol to write into
        symbol: String,
        /// Number of ticks to generate
        #[arg(long, default_value_t = 100_000)]
        count: usize,
        /// Ticks per append_batch call
        #[arg(long, default_value_t = 1000)]
        batch_size: usize,
        /// RNG seed for reproducible runs
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Import ticks from a CSV file (timestamp,price,volume per line)
    Import {
        /// Symbol to import into
        symbol: String,
        /// CSV file to read
        file: PathBuf,
    },
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display results in a formatted table
    Table,
    /// Display results as CSV
    Csv,
    /// Display results as JSON
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let format = args.output.into();
    match args.command {
        Command::Insert {
            symbol,
            timestamp,
            price,
            volume,
        } => commands::insert(&args.data_dir, &symbol, timestamp, price, volume),
        Command::Query { symbol, start, end } => {
            commands::query(&args.data_dir, &symbol, start, end, format)
        }
        Command::Last { symbol, count } => {
            commands::last(&args.data_dir, &symbol, count, format)
        }
        Command::Benchmark {
            symbol,
            count,
            batch_size,
            seed,
        } => commands::benchmark(&args.data_dir, &symbol, count, batch_size, seed),
        Command::Import { symbol, file } => commands::import(&args.data_dir, &symbol, &file),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tickdb_cli=debug,tickdb_engine=debug,tickdb_storage=debug")
    } else {
        EnvFilter::new("tickdb_cli=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
