//! unitkey CLI - canonicalize, fingerprint and summarize compilation records.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{canonicalize, fingerprint, summarize};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "UNITKEY_LOG";

#[derive(Parser)]
#[command(name = "unitkey")]
#[command(about = "Compilation record canonicalization and fingerprinting CLI")]
struct Cli {
    /// Log at debug level unless UNITKEY_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a record as canonical JSON
    Canonicalize {
        /// Input record JSON file (or stdin if not provided)
        input: Option<String>,
        /// Fail if two different entries share a key
        #[arg(long)]
        strict: bool,
        /// Print the canonicalization report to stderr
        #[arg(long)]
        report: bool,
    },
    /// Print the cache key of a record
    Fingerprint {
        /// Input record JSON file (or stdin if not provided)
        input: Option<String>,
        /// Encode the record exactly as given
        #[arg(long)]
        no_canonicalize: bool,
        /// Write the preimage bytes instead of their hash
        #[arg(long)]
        raw: bool,
    },
    /// Print the index summary of a record
    Summarize {
        /// Input record JSON file (or stdin if not provided)
        input: Option<String>,
        /// Sort input digests
        #[arg(long)]
        sorted: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Canonicalize {
            input,
            strict,
            report,
        } => canonicalize::run(input, strict, report),
        Commands::Fingerprint {
            input,
            no_canonicalize,
            raw,
        } => fingerprint::run(input, no_canonicalize, raw),
        Commands::Summarize { input, sorted } => summarize::run(input, sorted),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
