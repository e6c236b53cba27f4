//! Candidate generation: per-MSD tolerance queries against the LMD index.

use rayon::prelude::*;
use tracing::debug;

use rsm_model::{LmdId, MatchConfig, MsdId, SurveyRecord};

use crate::control::RunControl;
use crate::index::ChainageIndex;

/// A provisional MSD-LMD pairing that satisfies every tolerance predicate.
/// Lives only between the matcher and the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub msd: MsdId,
    pub lmd: LmdId,
    /// |msd.chainage - lmd.chainage| in meters.
    pub spatial_distance: f64,
    /// |msd.timestamp - lmd.timestamp| in seconds.
    pub time_distance_secs: f64,
}

/// Indices of records that may participate in matching: finite chainage.
/// Timestamps and lanes are already typed, so chainage is the only field
/// that can still be unusable here.
pub(crate) fn valid_indices(records: &[SurveyRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| record.chainage.is_finite().then_some(idx))
        .collect()
}

/// Produces, for each valid MSD record, exactly the set of LMD candidates
/// satisfying the chainage, lane, and time predicates simultaneously.
///
/// Matching is independent per MSD record and runs on rayon workers; the
/// per-record candidate vectors are collected in MSD order, so the output
/// is deterministic regardless of scheduling. Returns `None` when the run
/// was cancelled mid-flight.
pub(crate) fn generate_candidates(
    msd: &[SurveyRecord],
    msd_valid: &[usize],
    lmd: &[SurveyRecord],
    index: &ChainageIndex,
    config: &MatchConfig,
    control: &RunControl,
) -> Option<Vec<Candidate>> {
    let per_record: Vec<Vec<Candidate>> = msd_valid
        .par_iter()
        .map(|&msd_idx| {
            if control.cancel.is_cancelled() {
                return Vec::new();
            }
            let record = &msd[msd_idx];
            let candidates =
                candidates_for_record(MsdId::new(msd_idx as u64), record, lmd, index, config);
            control.progress.record_done();
            candidates
        })
        .collect();

    if control.cancel.is_cancelled() {
        return None;
    }

    let candidates: Vec<Candidate> = per_record.into_iter().flatten().collect();
    debug!(candidates = candidates.len(), "candidate generation complete");
    Some(candidates)
}

fn candidates_for_record(
    msd_id: MsdId,
    record: &SurveyRecord,
    lmd: &[SurveyRecord],
    index: &ChainageIndex,
    config: &MatchConfig,
) -> Vec<Candidate> {
    let time_tolerance_secs = config.time_tolerance_secs as f64;
    let mut out = Vec::new();
    for lmd_idx in index.query(record.chainage, record.lane, config.chainage_tolerance) {
        let other = &lmd[lmd_idx];
        // The index already pre-filters by lane when grouped; re-check to
        // hold the guarantee even over an ungrouped index.
        if config.require_lane_match && record.lane != other.lane {
            continue;
        }
        let time_distance_secs =
            (record.timestamp - other.timestamp).num_milliseconds().abs() as f64 / 1000.0;
        if time_distance_secs > time_tolerance_secs {
            continue;
        }
        out.push(Candidate {
            msd: msd_id,
            lmd: LmdId::new(lmd_idx as u64),
            spatial_distance: (record.chainage - other.chainage).abs(),
            time_distance_secs,
        });
    }
    out
}
