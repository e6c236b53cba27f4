//! Shared data model for the road-survey merge tool.
//!
//! MSD is the primary survey dataset; LMD is the secondary dataset whose
//! attributes are projected onto matched MSD rows. Everything the matching
//! engine, ingest, and output stages exchange is defined here.

#![deny(unsafe_code)]

mod config;
mod error;
mod ids;
mod lane;
mod outcome;
mod record;

pub use config::{
    ConfigError, DEFAULT_CHAINAGE_TOLERANCE_M, DEFAULT_TIME_TOLERANCE_SECS, MatchConfig,
    SelectionPolicy,
};
pub use error::{ModelError, Result};
pub use ids::{LmdId, MsdId};
pub use lane::Lane;
pub use outcome::{Association, MatchOutcome, RunReport};
pub use record::{CellValue, SurveyDataset, SurveyRecord};
