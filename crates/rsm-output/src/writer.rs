//! Output path derivation and CSV writing.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{MergedTable, Result};

/// Subfolder created next to the MSD file when no output directory is
/// given.
const DEFAULT_SUBFOLDER: &str = "LMD-MSD_Merged";

/// Marker preceding the LMD build number in LMD export filenames.
const VERSION_MARKER: &str = "V1.0.0.";

/// Extracts the numeric LMD build version from the LMD file path, e.g.
/// `TSD_V1.0.0.482_run3.csv` yields `482`. `unknown` when absent.
fn lmd_version(lmd_path: &Path) -> String {
    let raw = lmd_path.to_string_lossy();
    if let Some(start) = raw.find(VERSION_MARKER) {
        let digits: String = raw[start + VERSION_MARKER.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if !digits.is_empty() {
            return digits;
        }
    }
    "unknown".to_string()
}

/// Output filename carrying the LMD build version.
#[must_use]
pub fn output_filename(lmd_path: &Path) -> String {
    format!("LMD_MSD_Merged_V{}.csv", lmd_version(lmd_path))
}

/// Explicit output directory, or the default subfolder next to the MSD
/// file.
#[must_use]
pub fn resolve_output_dir(msd_path: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => msd_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_SUBFOLDER),
    }
}

/// Writes the merged table to `path`, creating parent directories on
/// demand.
///
/// # Errors
///
/// Fails on filesystem or CSV serialization errors.
pub fn write_csv(table: &MergedTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = table.rows.len(), "merged output written");
    Ok(())
}
