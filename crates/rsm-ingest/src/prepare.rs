//! Raw CSV rows to a prepared [`SurveyDataset`].

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use rsm_model::{CellValue, Lane, SurveyDataset, SurveyRecord};

use crate::columns::{
    CHAINAGE_ALIASES, LANE_ALIASES, LOCATION_ALIASES, TIMESTAMP_ALIASES, find_column,
};
use crate::timestamp::{LMD_FORMATS, MSD_FORMATS, parse_timestamp};
use crate::{IngestError, Result};

/// Which of the two survey datasets a file holds. Decides the dataset
/// label and the timestamp format chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Msd,
    Lmd,
}

impl DatasetKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Msd => "MSD",
            DatasetKind::Lmd => "LMD",
        }
    }

    fn timestamp_formats(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Msd => MSD_FORMATS,
            DatasetKind::Lmd => LMD_FORMATS,
        }
    }
}

/// Per-reason counts of rows the preparation stage excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestTally {
    pub rows_read: usize,
    pub kept: usize,
    pub bad_chainage: usize,
    pub bad_lane: usize,
    pub bad_timestamp: usize,
}

impl IngestTally {
    /// Total rows excluded for any reason.
    #[must_use]
    pub fn excluded(&self) -> usize {
        self.rows_read - self.kept
    }
}

/// A prepared dataset plus the exclusion tally for the run report.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub dataset: SurveyDataset,
    pub tally: IngestTally,
}

struct KeyColumns {
    chainage: usize,
    /// True when the chainage column is a `location` fallback in
    /// kilometers and must be scaled by 1000.
    chainage_is_location: bool,
    lane: usize,
    timestamp: usize,
}

fn resolve_key_columns(kind: DatasetKind, headers: &[String]) -> Result<KeyColumns> {
    let (chainage, chainage_is_location) = match find_column(headers, CHAINAGE_ALIASES) {
        Some(idx) => (idx, false),
        None => match find_column(headers, LOCATION_ALIASES) {
            Some(idx) => {
                info!(dataset = kind.name(), "using location * 1000 as chainage");
                (idx, true)
            }
            None => {
                return Err(IngestError::MissingColumn {
                    dataset: kind.name(),
                    column: "chainage",
                });
            }
        },
    };
    let lane = find_column(headers, LANE_ALIASES).ok_or(IngestError::MissingColumn {
        dataset: kind.name(),
        column: "lane",
    })?;
    let timestamp = find_column(headers, TIMESTAMP_ALIASES).ok_or(IngestError::MissingColumn {
        dataset: kind.name(),
        column: "timestamp",
    })?;
    Ok(KeyColumns {
        chainage,
        chainage_is_location,
        lane,
        timestamp,
    })
}

/// Reads and prepares one survey CSV file.
///
/// # Errors
///
/// Fails when the file cannot be read or when a required key column is
/// absent; individual bad rows are skipped and tallied instead.
pub fn load_dataset(kind: DatasetKind, path: &Path) -> Result<PreparedDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }
    prepare_rows(kind, headers, rows)
}

/// Prepares already-parsed CSV rows. Split out from [`load_dataset`] so the
/// normalization logic is testable without touching the filesystem.
///
/// # Errors
///
/// Fails when a required key column cannot be resolved from `headers`.
pub fn prepare_rows(
    kind: DatasetKind,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> Result<PreparedDataset> {
    let keys = resolve_key_columns(kind, &headers)?;
    let formats = kind.timestamp_formats();

    let mut dataset = SurveyDataset::new(kind.name(), headers.clone());
    let mut tally = IngestTally::default();

    for row in rows {
        tally.rows_read += 1;

        let Some(chainage) = row
            .get(keys.chainage)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .map(|value| {
                if keys.chainage_is_location {
                    value * 1000.0
                } else {
                    value
                }
            })
            .filter(|value| value.is_finite())
        else {
            tally.bad_chainage += 1;
            continue;
        };

        let Some(lane) = row.get(keys.lane).and_then(|raw| Lane::parse(raw).ok()) else {
            tally.bad_lane += 1;
            continue;
        };

        let Some(timestamp) = row
            .get(keys.timestamp)
            .and_then(|raw| parse_timestamp(raw, formats))
        else {
            tally.bad_timestamp += 1;
            continue;
        };

        let mut payload = BTreeMap::new();
        for (header, raw) in headers.iter().zip(row.iter()) {
            let value = raw.trim();
            let cell = if value.is_empty() {
                CellValue::Missing
            } else {
                CellValue::Text(value.to_string())
            };
            payload.insert(header.clone(), cell);
        }

        dataset.push(SurveyRecord {
            chainage,
            lane,
            timestamp,
            payload,
        });
        tally.kept += 1;
    }

    if tally.excluded() > 0 {
        warn!(
            dataset = kind.name(),
            excluded = tally.excluded(),
            bad_chainage = tally.bad_chainage,
            bad_lane = tally.bad_lane,
            bad_timestamp = tally.bad_timestamp,
            "excluded rows during preparation"
        );
    }
    info!(
        dataset = kind.name(),
        rows = tally.kept,
        "dataset prepared"
    );

    Ok(PreparedDataset { dataset, tally })
}
