//! Matching configuration and its fail-fast validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default chainage tolerance in meters.
pub const DEFAULT_CHAINAGE_TOLERANCE_M: f64 = 5.0;
/// Default time tolerance in seconds.
pub const DEFAULT_TIME_TOLERANCE_SECS: i64 = 10;

/// Policy used to reduce candidate matches to the final association.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Each MSD record independently takes its lowest-score candidate.
    #[default]
    Nearest,
    /// As `Nearest`, but each LMD record may be consumed by at most one
    /// MSD record; contention goes to the lower score.
    NearestUniqueLmd,
}

/// Tolerances and weights consumed by the matching engine.
///
/// A config is inert data until [`MatchConfig::validate`] has accepted it;
/// the engine validates before any matching work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum |msd.chainage - lmd.chainage| for a candidate, in meters.
    pub chainage_tolerance: f64,
    /// Maximum |msd.timestamp - lmd.timestamp| for a candidate, in seconds.
    pub time_tolerance_secs: i64,
    /// Require equal lanes on both sides of a candidate pair.
    pub require_lane_match: bool,
    pub selection_policy: SelectionPolicy,
    /// Weight of the chainage distance (meters) in the composite score.
    pub w_spatial: f64,
    /// Weight of the time distance (seconds) in the composite score.
    pub w_time: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            chainage_tolerance: DEFAULT_CHAINAGE_TOLERANCE_M,
            time_tolerance_secs: DEFAULT_TIME_TOLERANCE_SECS,
            require_lane_match: true,
            selection_policy: SelectionPolicy::default(),
            w_spatial: 1.0,
            w_time: 1.0,
        }
    }
}

impl MatchConfig {
    /// Checks every tunable and reports the first violation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.chainage_tolerance.is_finite() || self.chainage_tolerance <= 0.0 {
            return Err(ConfigError::NonPositiveChainageTolerance(
                self.chainage_tolerance,
            ));
        }
        if self.time_tolerance_secs <= 0 {
            return Err(ConfigError::NonPositiveTimeTolerance(
                self.time_tolerance_secs,
            ));
        }
        for (name, value) in [("w_spatial", self.w_spatial), ("w_time", self.w_time)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Fatal configuration problems, detected before any matching work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("chainage tolerance must be a positive finite number, got {0}")]
    NonPositiveChainageTolerance(f64),
    #[error("time tolerance must be positive, got {0}s")]
    NonPositiveTimeTolerance(i64),
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_tolerances() {
        let config = MatchConfig {
            chainage_tolerance: 0.0,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveChainageTolerance(_))
        ));

        let config = MatchConfig {
            chainage_tolerance: f64::NAN,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MatchConfig {
            time_tolerance_secs: -1,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveTimeTolerance(-1))
        ));
    }

    #[test]
    fn rejects_negative_weights() {
        let config = MatchConfig {
            w_time: -0.5,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight { name: "w_time", .. })
        ));
    }

    #[test]
    fn policy_round_trips_through_serde() {
        let json = serde_json::to_string(&SelectionPolicy::NearestUniqueLmd).unwrap();
        assert_eq!(json, "\"nearest-unique-lmd\"");
        let back: SelectionPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SelectionPolicy::NearestUniqueLmd);
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let config: MatchConfig =
            serde_json::from_str("{\"chainage_tolerance\": 2.5}").unwrap();
        assert_eq!(config.chainage_tolerance, 2.5);
        assert_eq!(config.time_tolerance_secs, DEFAULT_TIME_TOLERANCE_SECS);
        assert!(config.require_lane_match);
    }
}
