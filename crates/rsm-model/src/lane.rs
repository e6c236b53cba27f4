use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Canonical traffic-lane identifier.
///
/// Survey files label lanes inconsistently; `parse` accepts the canonical
/// forms plus the bare `1`/`2` shorthand some MSD exports use. Anything
/// else is rejected so malformed rows never reach the matcher.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Lane {
    L1,
    R1,
    L2,
    R2,
    Lsk1,
    Rsk1,
}

impl Lane {
    /// All lanes a prepared record may carry, in canonical order.
    pub const ALL: [Lane; 6] = [Lane::L1, Lane::R1, Lane::L2, Lane::R2, Lane::Lsk1, Lane::Rsk1];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::L1 => "L1",
            Lane::R1 => "R1",
            Lane::L2 => "L2",
            Lane::R2 => "R2",
            Lane::Lsk1 => "LSK1",
            Lane::Rsk1 => "RSK1",
        }
    }

    /// Parses a raw lane cell, applying the survey shorthand mapping
    /// (`1` means `L1`, `2` means `L2`).
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        match trimmed {
            "1" | "L1" => Ok(Lane::L1),
            "2" | "L2" => Ok(Lane::L2),
            "R1" => Ok(Lane::R1),
            "R2" => Ok(Lane::R2),
            "LSK1" => Ok(Lane::Lsk1),
            "RSK1" => Ok(Lane::Rsk1),
            _ => Err(ModelError::InvalidLane(trimmed.to_string())),
        }
    }
}

impl FromStr for Lane {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lane::parse(s)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_shorthand() {
        assert_eq!(Lane::parse("L1").unwrap(), Lane::L1);
        assert_eq!(Lane::parse(" 1 ").unwrap(), Lane::L1);
        assert_eq!(Lane::parse("2").unwrap(), Lane::L2);
        assert_eq!(Lane::parse("RSK1").unwrap(), Lane::Rsk1);
    }

    #[test]
    fn rejects_unknown_lanes() {
        assert!(Lane::parse("L3").is_err());
        assert!(Lane::parse("").is_err());
        assert!(Lane::parse("left").is_err());
    }
}
