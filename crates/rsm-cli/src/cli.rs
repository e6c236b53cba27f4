//! CLI argument definitions for the survey merger.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use rsm_model::SelectionPolicy;

#[derive(Parser)]
#[command(
    name = "survey-merge",
    version,
    about = "Merge LMD attributes onto MSD road-survey rows",
    long_about = "Merge two road-survey CSV exports that describe the same network.\n\n\
                  For every MSD row, the closest LMD row within the configured\n\
                  chainage, lane, and time tolerances is selected deterministically,\n\
                  and the chosen LMD columns are appended to the MSD table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge an LMD export onto an MSD export and write the result.
    Merge(MergeArgs),

    /// List the lane identifiers accepted in prepared data.
    Lanes,
}

#[derive(Parser)]
pub struct MergeArgs {
    /// Path to the MSD CSV file (primary dataset; every row is preserved).
    #[arg(value_name = "MSD_CSV")]
    pub msd: PathBuf,

    /// Path to the LMD CSV file (secondary dataset to be projected).
    #[arg(value_name = "LMD_CSV")]
    pub lmd: PathBuf,

    /// Output directory (default: <MSD dir>/LMD-MSD_Merged).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON profile with matching and merge settings; flags override it.
    #[arg(long = "config", value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Maximum chainage difference in meters.
    #[arg(long = "chainage-tolerance", value_name = "METERS")]
    pub chainage_tolerance: Option<f64>,

    /// Maximum time difference in seconds.
    #[arg(long = "time-tolerance", value_name = "SECS")]
    pub time_tolerance: Option<i64>,

    /// Candidate selection policy.
    #[arg(long = "policy", value_enum)]
    pub policy: Option<PolicyArg>,

    /// Allow matches across different lanes.
    #[arg(long = "no-lane-match")]
    pub no_lane_match: bool,

    /// Weight of the chainage distance in the composite score.
    #[arg(long = "w-spatial", value_name = "WEIGHT")]
    pub w_spatial: Option<f64>,

    /// Weight of the time distance in the composite score.
    #[arg(long = "w-time", value_name = "WEIGHT")]
    pub w_time: Option<f64>,

    /// Comma-separated LMD columns to include in the output.
    #[arg(long = "lmd-columns", value_delimiter = ',', value_name = "COLS")]
    pub lmd_columns: Option<Vec<String>>,

    /// Match and report without writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Each MSD row takes its nearest candidate independently.
    Nearest,
    /// Each LMD row may be consumed by at most one MSD row.
    NearestUniqueLmd,
}

impl From<PolicyArg> for SelectionPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Nearest => SelectionPolicy::Nearest,
            PolicyArg::NearestUniqueLmd => SelectionPolicy::NearestUniqueLmd,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
