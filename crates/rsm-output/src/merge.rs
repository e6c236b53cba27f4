//! Projection of the final association onto the MSD table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rsm_model::{Association, CellValue, MatchOutcome, MsdId, SurveyDataset};

/// LMD columns included in the output when the caller selects none
/// explicitly: the essential deflection measurements.
pub const DEFAULT_LMD_COLUMNS: &[&str] = &[
    "BinViewerVersion",
    "Filename",
    "tsdSlope3000",
    "tsdSlope2000",
    "tsdSlope1000",
    "compositeModulus3000",
    "compositeModulus2000",
];

/// Selection of LMD payload columns for the merged output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// LMD columns to project onto matched MSD rows, in output order.
    pub lmd_columns: Vec<String>,
    /// Suffix applied when a selected LMD column collides with an existing
    /// output column (`_lmd`, escalating to `_lmd2`, `_lmd3`, ...).
    pub lmd_suffix: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            lmd_columns: DEFAULT_LMD_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            lmd_suffix: "_lmd".to_string(),
        }
    }
}

/// The merged output table, ready for the CSV writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Builds the output table: all MSD columns and rows in source order, the
/// match-distance columns, then the selected LMD columns. Unmatched MSD
/// rows keep empty LMD cells; no row is dropped.
#[must_use]
pub fn build_merged_table(
    msd: &SurveyDataset,
    lmd: &SurveyDataset,
    association: &Association,
    options: &MergeOptions,
) -> MergedTable {
    let mut columns = msd.columns.clone();
    columns.push("time_diff_seconds".to_string());
    columns.push("chainage_diff_meters".to_string());

    // Selected LMD columns that exist in the LMD file, renamed where they
    // collide with a column already in the output.
    let mut taken: BTreeSet<String> = columns.iter().cloned().collect();
    let mut selected: Vec<(String, String)> = Vec::new();
    for source in &options.lmd_columns {
        if !lmd.columns.iter().any(|c| c == source) {
            warn!(column = %source, "selected LMD column not present in LMD data");
            continue;
        }
        let output = unique_name(source, &options.lmd_suffix, &taken);
        taken.insert(output.clone());
        selected.push((source.clone(), output));
    }
    columns.extend(selected.iter().map(|(_, output)| output.clone()));

    let mut rows = Vec::with_capacity(msd.len());
    for (idx, record) in msd.records.iter().enumerate() {
        let mut row: Vec<String> = msd
            .columns
            .iter()
            .map(|column| {
                record
                    .payload
                    .get(column)
                    .map_or(String::new(), |cell| cell.as_text().to_string())
            })
            .collect();

        let outcome = association.outcome(MsdId::new(idx as u64));
        match outcome {
            Some(MatchOutcome::Matched {
                lmd: lmd_id,
                spatial_distance,
                time_distance_secs,
            }) => {
                row.push(format!("{time_distance_secs}"));
                row.push(format!("{spatial_distance}"));
                let lmd_record = &lmd.records[lmd_id.index()];
                for (source, _) in &selected {
                    let cell = lmd_record
                        .payload
                        .get(source)
                        .map_or("", CellValue::as_text);
                    row.push(cell.to_string());
                }
            }
            _ => {
                row.push(String::new());
                row.push(String::new());
                for _ in &selected {
                    row.push(String::new());
                }
            }
        }
        rows.push(row);
    }

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        "merged table built"
    );
    MergedTable { columns, rows }
}

/// First collision-free name for a selected LMD column.
fn unique_name(source: &str, suffix: &str, taken: &BTreeSet<String>) -> String {
    if !taken.contains(source) {
        return source.to_string();
    }
    let suffixed = format!("{source}{suffix}");
    if !taken.contains(&suffixed) {
        return suffixed;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{source}{suffix}{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
