//! CSV ingest and preparation for the survey datasets.
//!
//! Reads a raw survey export, discovers the matching-key columns by alias,
//! normalizes lanes and timestamps, and emits a typed [`SurveyDataset`]
//! for the engine. Rows that cannot supply valid matching keys are skipped
//! and tallied, never silently matched.

#![deny(unsafe_code)]

mod columns;
mod prepare;
mod timestamp;

pub use prepare::{DatasetKind, IngestTally, PreparedDataset, load_dataset, prepare_rows};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{dataset} data has no usable {column} column")]
    MissingColumn {
        dataset: &'static str,
        column: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
