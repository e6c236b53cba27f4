//! Implementations of the CLI subcommands.

use std::fs;
use std::time::Duration;

use anyhow::{Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use rsm_engine::{RunControl, run_match};
use rsm_ingest::{DatasetKind, load_dataset};
use rsm_model::Lane;
use rsm_output::{build_merged_table, match_stats, output_filename, resolve_output_dir, write_csv};

use crate::cli::MergeArgs;
use crate::types::{MergeResult, RunProfile};

/// Loads the run profile and applies flag overrides on top.
fn effective_profile(args: &MergeArgs) -> anyhow::Result<RunProfile> {
    let mut profile = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => RunProfile::default(),
    };

    if let Some(value) = args.chainage_tolerance {
        profile.matching.chainage_tolerance = value;
    }
    if let Some(value) = args.time_tolerance {
        profile.matching.time_tolerance_secs = value;
    }
    if let Some(policy) = args.policy {
        profile.matching.selection_policy = policy.into();
    }
    if args.no_lane_match {
        profile.matching.require_lane_match = false;
    }
    if let Some(value) = args.w_spatial {
        profile.matching.w_spatial = value;
    }
    if let Some(value) = args.w_time {
        profile.matching.w_time = value;
    }
    if let Some(columns) = &args.lmd_columns {
        profile.merge.lmd_columns = columns.clone();
    }
    Ok(profile)
}

pub fn run_merge(args: &MergeArgs) -> anyhow::Result<MergeResult> {
    let profile = effective_profile(args)?;
    profile
        .matching
        .validate()
        .context("invalid matching configuration")?;

    let msd = load_dataset(DatasetKind::Msd, &args.msd)
        .with_context(|| format!("loading MSD data from {}", args.msd.display()))?;
    let lmd = load_dataset(DatasetKind::Lmd, &args.lmd)
        .with_context(|| format!("loading LMD data from {}", args.lmd.display()))?;
    info!(
        msd_rows = msd.dataset.len(),
        lmd_rows = lmd.dataset.len(),
        "datasets prepared"
    );

    let control = RunControl::new();
    let bar = progress_bar(msd.dataset.len() as u64);
    let run = std::thread::scope(|scope| {
        let worker = scope.spawn(|| run_match(&msd.dataset, &lmd.dataset, &profile.matching, &control));
        while !worker.is_finished() {
            bar.set_position(control.progress.done() as u64);
            std::thread::sleep(Duration::from_millis(50));
        }
        worker.join()
    })
    .map_err(|_| anyhow!("matching thread panicked"))?;
    bar.finish_and_clear();
    let run = run?;

    let output_path = if args.dry_run {
        None
    } else {
        let table = build_merged_table(&msd.dataset, &lmd.dataset, &run.association, &profile.merge);
        let dir = resolve_output_dir(&args.msd, args.output_dir.as_deref());
        let path = dir.join(output_filename(&args.lmd));
        write_csv(&table, &path)?;
        Some(path)
    };

    Ok(MergeResult {
        report: run.report,
        stats: match_stats(&run.association),
        msd_excluded: msd.tally.excluded(),
        lmd_excluded: lmd.tally.excluded(),
        output_path,
    })
}

pub fn run_lanes() {
    for lane in Lane::ALL {
        println!("{lane}");
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} MSD records matched")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
