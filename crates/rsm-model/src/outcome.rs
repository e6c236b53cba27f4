//! Final association and per-record outcomes produced by the engine.

use std::collections::BTreeMap;

use crate::{LmdId, MsdId};

/// What happened to one MSD record during a matching run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome {
    /// Matched to an LMD record within all tolerances.
    Matched {
        lmd: LmdId,
        /// |msd.chainage - lmd.chainage| in meters.
        spatial_distance: f64,
        /// |msd.timestamp - lmd.timestamp| in seconds.
        time_distance_secs: f64,
    },
    /// No LMD candidate satisfied the tolerance predicates.
    NoCandidate,
    /// Candidates existed but every one was claimed by a lower-scoring MSD
    /// record under the unique-LMD policy.
    LostContention,
}

impl MatchOutcome {
    #[must_use]
    pub fn lmd(&self) -> Option<LmdId> {
        match self {
            MatchOutcome::Matched { lmd, .. } => Some(*lmd),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }
}

/// The resolved MSD-to-LMD mapping: at most one LMD record per MSD record,
/// with an outcome tag for every MSD record that entered matching.
///
/// Immutable once produced; this is the sole bridge between the two
/// datasets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Association {
    outcomes: BTreeMap<MsdId, MatchOutcome>,
}

impl Association {
    #[must_use]
    pub fn from_outcomes(outcomes: BTreeMap<MsdId, MatchOutcome>) -> Self {
        Self { outcomes }
    }

    #[must_use]
    pub fn outcome(&self, msd: MsdId) -> Option<&MatchOutcome> {
        self.outcomes.get(&msd)
    }

    /// All outcomes in ascending MSD id order.
    pub fn iter(&self) -> impl Iterator<Item = (MsdId, &MatchOutcome)> {
        self.outcomes.iter().map(|(id, outcome)| (*id, outcome))
    }

    /// Matched pairs only, in ascending MSD id order.
    pub fn matched_pairs(&self) -> impl Iterator<Item = (MsdId, LmdId)> {
        self.outcomes
            .iter()
            .filter_map(|(msd, outcome)| outcome.lmd().map(|lmd| (*msd, lmd)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Tallies outcome counts into a report, folding in the preparation
    /// stage's invalid-row counts.
    #[must_use]
    pub fn report(&self, total_msd: usize, invalid_msd: usize, invalid_lmd: usize) -> RunReport {
        let mut report = RunReport {
            total_msd,
            invalid_msd,
            invalid_lmd,
            ..RunReport::default()
        };
        for (_, outcome) in self.iter() {
            match outcome {
                MatchOutcome::Matched { .. } => report.matched += 1,
                MatchOutcome::NoCandidate => report.unmatched_no_candidate += 1,
                MatchOutcome::LostContention => report.unmatched_lost_contention += 1,
            }
        }
        report
    }
}

/// User-visible counts for one matching run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunReport {
    /// MSD records that entered the run, valid or not.
    pub total_msd: usize,
    pub matched: usize,
    pub unmatched_no_candidate: usize,
    pub unmatched_lost_contention: usize,
    /// MSD records excluded before matching (bad chainage at engine level).
    pub invalid_msd: usize,
    /// LMD records excluded before matching.
    pub invalid_lmd: usize,
}

impl RunReport {
    /// Fraction of total MSD records that matched, as a percentage.
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        if self.total_msd == 0 {
            0.0
        } else {
            self.matched as f64 / self.total_msd as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_every_outcome_once() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(
            MsdId::new(0),
            MatchOutcome::Matched {
                lmd: LmdId::new(3),
                spatial_distance: 1.0,
                time_distance_secs: 2.0,
            },
        );
        outcomes.insert(MsdId::new(1), MatchOutcome::NoCandidate);
        outcomes.insert(MsdId::new(2), MatchOutcome::LostContention);
        let association = Association::from_outcomes(outcomes);

        let report = association.report(4, 1, 0);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched_no_candidate, 1);
        assert_eq!(report.unmatched_lost_contention, 1);
        assert_eq!(report.invalid_msd, 1);
        assert_eq!(
            report.matched + report.unmatched_no_candidate + report.unmatched_lost_contention
                + report.invalid_msd,
            report.total_msd
        );
    }

    #[test]
    fn match_rate_handles_empty_input() {
        assert_eq!(RunReport::default().match_rate(), 0.0);
    }
}
