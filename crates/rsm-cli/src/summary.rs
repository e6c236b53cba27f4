//! End-of-run summary rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use rsm_output::DistanceStats;

use crate::types::MergeResult;

pub fn print_summary(result: &MergeResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Count"]);
    for (label, value) in count_rows(result) {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    println!("{}", render_detail(result));
}

fn count_rows(result: &MergeResult) -> Vec<(&'static str, usize)> {
    let report = &result.report;
    vec![
        ("MSD rows", report.total_msd),
        ("Matched", report.matched),
        ("Unmatched (no candidate)", report.unmatched_no_candidate),
        ("Unmatched (lost contention)", report.unmatched_lost_contention),
        ("Invalid (engine)", report.invalid_msd),
        ("Excluded at ingest (MSD)", result.msd_excluded),
        ("Excluded at ingest (LMD)", result.lmd_excluded),
    ]
}

/// Plain-text detail block appended after the count table, also used by
/// tests to pin the exact rendering.
#[must_use]
pub fn render_detail(result: &MergeResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Match rate: {:.1}% of MSD rows\n",
        result.report.match_rate()
    ));
    out.push_str(&render_stats("Time diff", "s", result.stats.time_secs.as_ref()));
    out.push_str(&render_stats(
        "Chainage diff",
        "m",
        result.stats.chainage_m.as_ref(),
    ));
    match &result.output_path {
        Some(path) => out.push_str(&format!("Saved: {}\n", path.display())),
        None => out.push_str("Dry run: no output written\n"),
    }
    out
}

fn render_stats(label: &str, unit: &str, stats: Option<&DistanceStats>) -> String {
    match stats {
        Some(stats) => format!(
            "{label} - Min: {:.2}{unit}, Mean: {:.2}{unit}, Max: {:.2}{unit}\n",
            stats.min, stats.mean, stats.max
        ),
        None => format!("{label} - no matched rows\n"),
    }
}
