//! Matching engine for MSD/LMD road-survey reconciliation.
//!
//! Pure compute: takes two prepared [`SurveyDataset`]s and a validated
//! [`MatchConfig`], builds a chainage index over LMD, generates candidate
//! pairs under the configured tolerances, and resolves them to a
//! deterministic final association. No I/O, no global state.

#![deny(unsafe_code)]

mod control;
mod index;
mod matcher;
mod resolver;

pub use control::{CancelToken, ProgressCounter, RunControl};
pub use index::ChainageIndex;
pub use matcher::Candidate;

use thiserror::Error;
use tracing::{info, warn};

use rsm_model::{Association, ConfigError, MatchConfig, MsdId, RunReport, SurveyDataset};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The run was cancelled before the resolver completed; no partial
    /// association is emitted.
    #[error("matching run cancelled")]
    Cancelled,
}

/// Result of one complete matching run.
#[derive(Debug, Clone)]
pub struct MatchRun {
    pub association: Association,
    pub report: RunReport,
}

/// Runs the full engine: validate configuration, index LMD, generate
/// candidates, resolve.
///
/// Empty inputs are not errors; the run completes with an empty (or
/// all-`NoCandidate`) association and a warning. Records with non-finite
/// chainage are excluded from matching and tallied in the report.
///
/// # Errors
///
/// [`EngineError::Config`] before any matching work when the configuration
/// is invalid; [`EngineError::Cancelled`] when `control.cancel` fired
/// before resolution.
pub fn run_match(
    msd: &SurveyDataset,
    lmd: &SurveyDataset,
    config: &MatchConfig,
    control: &RunControl,
) -> Result<MatchRun, EngineError> {
    config.validate()?;

    if msd.is_empty() {
        warn!(dataset = %msd.name, "input dataset is empty");
    }
    if lmd.is_empty() {
        warn!(dataset = %lmd.name, "input dataset is empty");
    }

    let msd_valid = matcher::valid_indices(&msd.records);
    let lmd_valid = matcher::valid_indices(&lmd.records);
    let invalid_msd = msd.len() - msd_valid.len();
    let invalid_lmd = lmd.len() - lmd_valid.len();
    if invalid_msd > 0 || invalid_lmd > 0 {
        warn!(invalid_msd, invalid_lmd, "excluded records with non-finite chainage");
    }

    info!(
        msd = msd_valid.len(),
        lmd = lmd_valid.len(),
        "building chainage index"
    );
    let index = ChainageIndex::build(&lmd.records, &lmd_valid, config.require_lane_match);

    let candidates =
        matcher::generate_candidates(&msd.records, &msd_valid, &lmd.records, &index, config, control)
            .ok_or(EngineError::Cancelled)?;
    info!(candidates = candidates.len(), "generated candidate pairs");

    let msd_ids: Vec<MsdId> = msd_valid.iter().map(|&idx| MsdId::new(idx as u64)).collect();
    let association = resolver::resolve(&msd_ids, &candidates, config);
    let report = association.report(msd.len(), invalid_msd, invalid_lmd);
    info!(
        matched = report.matched,
        no_candidate = report.unmatched_no_candidate,
        lost_contention = report.unmatched_lost_contention,
        "matching run complete"
    );

    Ok(MatchRun {
        association,
        report,
    })
}
