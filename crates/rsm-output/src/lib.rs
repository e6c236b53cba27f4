//! Output stage: projects the final association onto the MSD table and
//! writes the merged CSV.
//!
//! Every MSD row survives to the output in its original order; LMD cells
//! are empty where no match exists.

#![deny(unsafe_code)]

mod merge;
mod stats;
mod writer;

pub use merge::{DEFAULT_LMD_COLUMNS, MergeOptions, MergedTable, build_merged_table};
pub use stats::{DistanceStats, MatchStats, match_stats};
pub use writer::{output_filename, resolve_output_dir, write_csv};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;
