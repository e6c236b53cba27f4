//! Distance statistics over matched rows, for the end-of-run summary.

use rsm_model::{Association, MatchOutcome};

/// Min/mean/max of one distance component across matched pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl DistanceStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        Some(Self {
            min,
            mean: sum / values.len() as f64,
            max,
        })
    }
}

/// Distance statistics for a completed run; `None` when nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatchStats {
    pub time_secs: Option<DistanceStats>,
    pub chainage_m: Option<DistanceStats>,
}

#[must_use]
pub fn match_stats(association: &Association) -> MatchStats {
    let mut times = Vec::new();
    let mut chainages = Vec::new();
    for (_, outcome) in association.iter() {
        if let MatchOutcome::Matched {
            spatial_distance,
            time_distance_secs,
            ..
        } = outcome
        {
            times.push(*time_distance_secs);
            chainages.push(*spatial_distance);
        }
    }
    MatchStats {
        time_secs: DistanceStats::from_values(&times),
        chainage_m: DistanceStats::from_values(&chainages),
    }
}
