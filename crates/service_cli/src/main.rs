//! qrng CLI - Direction Tables and Sample Points
//!
//! This is the operational entry point for the qrng sequence workspace.
//!
//! # Commands
//!
//! - `qrng convert --input <txt> --output <bin>` - Encode a Joe & Kuo text
//!   table into the packed format
//! - `qrng dump --input <bin>` - Print a packed table as text
//! - `qrng generate --sequence <kind> --dimensions <d> --count <n>` - Print points
//!
//! # Configuration
//!
//! `--config <toml>`, then `QRNG_LOG_LEVEL` / `QRNG_TABLE`, then flags; see
//! [`config::build_config`]. `RUST_LOG` still wins for log filtering.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use commands::generate::{GenerateOptions, SequenceKind};
use config::{build_config, CliArgs, LogLevel, OutputFormat};
pub use error::{CliError, Result};

/// Quasi-random and pseudo-random sequence tool
#[derive(Parser)]
#[command(name = "qrng")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a Joe & Kuo text direction table into the packed format
    Convert {
        /// Text table to read
        #[arg(short, long)]
        input: PathBuf,

        /// Packed table to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print a packed direction table in the text format
    Dump {
        /// Packed table to read
        #[arg(short, long)]
        input: PathBuf,

        /// Last dimension to print (defaults to the table's maximum)
        #[arg(short, long)]
        max_dimension: Option<usize>,
    },

    /// Print points from a sequence
    Generate {
        /// Sequence family
        #[arg(short, long, value_enum, default_value = "sobol")]
        sequence: SequenceKind,

        /// Dimensions per point
        #[arg(short, long, default_value = "2")]
        dimensions: usize,

        /// Number of points
        #[arg(short = 'n', long, default_value = "16")]
        count: usize,

        /// Apply RR2 digit scrambling (halton)
        #[arg(long)]
        scramble: bool,

        /// Initial index offset (halton)
        #[arg(long, default_value = "0")]
        skip: u32,

        /// Index stride (halton)
        #[arg(long, default_value = "1")]
        leap: u32,

        /// Generator seed (mt32, mt64)
        #[arg(long, default_value = "5489")]
        seed: u64,

        /// Packed direction table (sobol); overrides QRNG_TABLE
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

fn init_tracing(level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter_str())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (table, format) = match &cli.command {
        Commands::Generate { table, format, .. } => (table.clone(), *format),
        _ => (None, None),
    };
    let args = CliArgs {
        config_file: cli.config.clone(),
        verbose: cli.verbose,
        table,
        format,
    };
    let config = build_config(&args).context("failed to load configuration")?;

    init_tracing(config.log_level);
    if cli.verbose {
        info!("Verbose mode enabled");
    }
    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Convert { input, output } => {
            let rows = commands::convert::run(&input, &output).with_context(|| {
                format!("failed to convert {} to {}", input.display(), output.display())
            })?;
            println!("{}", commands::convert::summary(rows, &output));
        }
        Commands::Dump {
            input,
            max_dimension,
        } => commands::dump::run(&input, max_dimension)
            .with_context(|| format!("failed to dump {}", input.display()))?,
        Commands::Generate {
            sequence,
            dimensions,
            count,
            scramble,
            skip,
            leap,
            seed,
            table,
            ..
        } => {
            // Configured tables only feed Sobol; an explicit --table is checked.
            let table = match sequence {
                SequenceKind::Sobol => config.table.clone(),
                _ => table,
            };
            let options = GenerateOptions {
                sequence,
                dimensions,
                count,
                scramble,
                skip,
                leap,
                seed,
                table,
                format: config.format,
            };
            commands::generate::run(&options).context("failed to generate points")?;
        }
    }
    Ok(())
}
