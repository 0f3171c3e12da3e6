//! CLI argument definitions for PowerPos.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Validate, profile and aggregate one trade day |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Simulated day, reports under $POWERPOS_HOME/reports
//! powerpos run --date 01/08/2022
//!
//! # Recorded batches, custom zones and run tag
//! powerpos run --input trades.json --date 01/08/2022 \
//!     --input-tz Europe/London --output-tz UTC --run-time 1830
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// PowerPos - day-ahead power position reporting
///
/// Validates intraday trade volumes against the 5-minute grid, profiles
/// data-quality defects and writes hourly aggregated positions.
#[derive(Debug, Parser)]
#[command(
    name = "powerpos",
    author,
    version,
    about = "Day-ahead power position reporting",
    long_about = "PowerPos validates a day of intraday trade volumes, profiles data-quality \
defects and aggregates valid volumes into hourly positions.\n\
\n\
Three CSV reports are written per run: the aggregated positions, the exception rows \
and a per-identifier quality summary.\n\
\n\
Use 'powerpos <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for the run report.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Key/value listing for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process one trade day and write its reports.
    ///
    /// # Examples
    ///
    ///   powerpos run
    ///   powerpos run --date 01/08/2022 --seed 7
    ///   powerpos run --input trades.json --date 01/08/2022 --output-dir ./reports
    Run(RunArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Trade date as DD/MM/YYYY. Defaults to today in the input zone, and is
    /// required with `--input`.
    #[arg(long)]
    pub date: Option<String>,

    /// Directory for the CSV reports. Defaults to $POWERPOS_HOME/reports.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// JSON file of recorded batches, all for `--date`. Without it a
    /// simulated day is generated.
    #[arg(long, requires = "date")]
    pub input: Option<PathBuf>,

    /// IANA zone the trade times are recorded in (env: POWERPOS_INPUT_TZ).
    #[arg(long)]
    pub input_tz: Option<String>,

    /// IANA zone the hourly labels are rendered in (env: POWERPOS_OUTPUT_TZ).
    #[arg(long)]
    pub output_tz: Option<String>,

    /// HHMM tag appended to the report file names.
    #[arg(long)]
    pub run_time: Option<String>,

    /// Seed for the simulated source.
    #[arg(long, conflicts_with = "input")]
    pub seed: Option<u64>,

    /// Upper bound on simulated positions.
    #[arg(long, conflicts_with = "input")]
    pub max_positions: Option<usize>,
}
