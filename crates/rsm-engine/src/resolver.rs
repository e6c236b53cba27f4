//! Reduction of the candidate table to the final association.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use rsm_model::{Association, MatchConfig, MatchOutcome, MsdId, SelectionPolicy};

use crate::matcher::Candidate;

/// Composite distance used to rank candidates. Units are normalized up
/// front (meters and seconds), so equal default weights compare them
/// directly.
fn score(candidate: &Candidate, config: &MatchConfig) -> f64 {
    config.w_spatial * candidate.spatial_distance + config.w_time * candidate.time_distance_secs
}

/// Applies the configured selection policy to the complete candidate table.
///
/// `msd_ids` is the full set of MSD records that entered matching; records
/// without any surviving candidate are tagged [`MatchOutcome::NoCandidate`]
/// rather than dropped. Deterministic: all ordering is by score with
/// `f64::total_cmp`, then by id — never by map iteration or arrival order.
pub(crate) fn resolve(
    msd_ids: &[MsdId],
    candidates: &[Candidate],
    config: &MatchConfig,
) -> Association {
    let mut outcomes: BTreeMap<MsdId, MatchOutcome> = msd_ids
        .iter()
        .map(|&id| (id, MatchOutcome::NoCandidate))
        .collect();

    match config.selection_policy {
        SelectionPolicy::Nearest => {
            for candidate in candidates {
                let entry = outcomes.entry(candidate.msd).or_insert(MatchOutcome::NoCandidate);
                let better = match entry {
                    MatchOutcome::Matched { .. } => {
                        let current = current_as_candidate(candidate.msd, entry);
                        is_preferred(candidate, &current, config)
                    }
                    _ => true,
                };
                if better {
                    *entry = matched(candidate);
                }
            }
        }
        SelectionPolicy::NearestUniqueLmd => {
            // Single resolution pass over the global table in (score, lmd,
            // msd) order: every claim goes to the lowest score, and a loser
            // falls through to its next-best unclaimed candidate.
            let mut ordered: Vec<&Candidate> = candidates.iter().collect();
            ordered.sort_by(|a, b| {
                score(a, config)
                    .total_cmp(&score(b, config))
                    .then_with(|| a.lmd.cmp(&b.lmd))
                    .then_with(|| a.msd.cmp(&b.msd))
            });

            let mut claimed_lmd = BTreeSet::new();
            let mut assigned_msd = BTreeSet::new();
            let mut contenders = BTreeSet::new();
            for candidate in ordered {
                contenders.insert(candidate.msd);
                if claimed_lmd.contains(&candidate.lmd) || assigned_msd.contains(&candidate.msd) {
                    continue;
                }
                claimed_lmd.insert(candidate.lmd);
                assigned_msd.insert(candidate.msd);
                outcomes.insert(candidate.msd, matched(candidate));
            }
            for msd in contenders {
                if !assigned_msd.contains(&msd) {
                    outcomes.insert(msd, MatchOutcome::LostContention);
                }
            }
        }
    }

    debug!(
        policy = ?config.selection_policy,
        resolved = outcomes.len(),
        "candidate resolution complete"
    );
    Association::from_outcomes(outcomes)
}

fn matched(candidate: &Candidate) -> MatchOutcome {
    MatchOutcome::Matched {
        lmd: candidate.lmd,
        spatial_distance: candidate.spatial_distance,
        time_distance_secs: candidate.time_distance_secs,
    }
}

fn current_as_candidate(msd: MsdId, outcome: &MatchOutcome) -> Candidate {
    match outcome {
        MatchOutcome::Matched {
            lmd,
            spatial_distance,
            time_distance_secs,
        } => Candidate {
            msd,
            lmd: *lmd,
            spatial_distance: *spatial_distance,
            time_distance_secs: *time_distance_secs,
        },
        _ => unreachable!("only called for matched outcomes"),
    }
}

/// True when `a` should win over `b` for the same MSD record: lower score,
/// ties broken by the lower LMD id.
fn is_preferred(a: &Candidate, b: &Candidate, config: &MatchConfig) -> bool {
    score(a, config)
        .total_cmp(&score(b, config))
        .then_with(|| a.lmd.cmp(&b.lmd))
        .is_lt()
}
