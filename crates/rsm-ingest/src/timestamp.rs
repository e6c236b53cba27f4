//! Timestamp parsing with per-dataset format fallback chains.

use chrono::NaiveDateTime;

/// MSD exports use day-first local formats, with or without fractional
/// seconds and with two- or four-digit years.
pub(crate) const MSD_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// LMD exports are nominally ISO 8601 UTC, but older instruments fall back
/// to the same day-first formats as MSD.
pub(crate) const LMD_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%y %H:%M:%S",
];

/// First format in the chain that parses wins.
pub(crate) fn parse_timestamp(raw: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}
