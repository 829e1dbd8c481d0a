//! CLI argument definitions for folio.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Full portfolio analysis report |
//! | `metrics` | Per-ticker metric tables |
//! | `correlation` | Correlation matrix for a set of tickers |
//!
//! # Examples
//!
//! ```bash
//! # Full report for a saved portfolio against the CSV store
//! folio analyze --portfolio tech.json --start 2023-01-01 --end 2024-01-01 --pretty
//!
//! # Inline holdings, monthly frequency, relational backend
//! folio analyze --holdings "AAPL=0.5,MSFT=0.5" --start 2023-01-01 --end 2024-01-01 \
//!     --frequency monthly --store table --db-path data/timeseries.duckdb
//!
//! # Per-ticker metrics with a risk-free rate file
//! folio metrics AAPL MSFT --start 2023-01-01 --end 2024-01-01 --rates data/SOFR.csv
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Portfolio risk/return analytics over stored return series.
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    author,
    version,
    about = "Portfolio risk/return analytics over stored return series"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object output.
    Json,
    /// Plain-text layout for terminal display.
    Table,
}

/// Which backing store to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreSelector {
    /// One CSV file per ticker under --data-dir.
    Csv,
    /// Single DuckDB timeseries table at --db-path.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full portfolio analysis report.
    Analyze(AnalyzeArgs),
    /// Per-ticker metric tables.
    Metrics(MetricsArgs),
    /// Correlation matrix for a set of tickers.
    Correlation(CorrelationArgs),
}

/// Data-source and analysis-window options shared by every command.
#[derive(Debug, Args)]
pub struct DataArgs {
    /// Inclusive start date (YYYY-MM-DD).
    #[arg(long)]
    pub start: String,

    /// Inclusive end date (YYYY-MM-DD).
    #[arg(long)]
    pub end: String,

    /// Analysis frequency: daily/1d, weekly/1w, monthly/1m, quarterly/1q.
    #[arg(long, default_value = "daily")]
    pub frequency: String,

    /// Market benchmark ticker for beta and alpha.
    #[arg(long, default_value = "SPY")]
    pub market: String,

    /// Which backing store to read.
    #[arg(long, value_enum, default_value_t = StoreSelector::Csv)]
    pub store: StoreSelector,

    /// Directory of per-ticker CSV files (csv store).
    #[arg(long, default_value = "data/timeseries")]
    pub data_dir: PathBuf,

    /// DuckDB database file (table store).
    #[arg(long, default_value = "data/timeseries.duckdb")]
    pub db_path: PathBuf,

    /// Benchmark-rate CSV used to resolve the risk-free rate.
    /// When absent, R_f = 0 with a warning.
    #[arg(long)]
    pub rates: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Portfolio definition JSON file: {"name": ..., "holdings": {...}}.
    #[arg(long, conflicts_with = "holdings")]
    pub portfolio: Option<PathBuf>,

    /// Inline holdings, e.g. "AAPL=0.5,MSFT=0.5".
    #[arg(long)]
    pub holdings: Option<String>,

    /// Portfolio name when holdings are given inline.
    #[arg(long, default_value = "Portfolio")]
    pub name: String,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Args)]
pub struct MetricsArgs {
    /// Tickers to analyze.
    #[arg(required = true)]
    pub tickers: Vec<String>,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Args)]
pub struct CorrelationArgs {
    /// Tickers to correlate (at least two).
    #[arg(required = true, num_args = 2..)]
    pub tickers: Vec<String>,

    #[command(flatten)]
    pub data: DataArgs,
}
