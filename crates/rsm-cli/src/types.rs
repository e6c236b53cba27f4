//! CLI-level types: the JSON run profile and the merge command result.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use rsm_model::{MatchConfig, RunReport};
use rsm_output::{MatchStats, MergeOptions};

/// Persistent run settings loadable from `--config <JSON>`. Any omitted
/// section falls back to defaults; CLI flags override either section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProfile {
    pub matching: MatchConfig,
    pub merge: MergeOptions,
}

/// Everything the summary needs about a completed merge command.
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub report: RunReport,
    pub stats: MatchStats,
    /// Rows the preparation stage excluded per dataset.
    pub msd_excluded: usize,
    pub lmd_excluded: usize,
    /// Where the merged CSV was written; `None` on --dry-run.
    pub output_path: Option<PathBuf>,
}
