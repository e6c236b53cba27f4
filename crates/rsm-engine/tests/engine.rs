use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use rsm_engine::{CancelToken, EngineError, RunControl, run_match};
use rsm_model::{
    Lane, LmdId, MatchConfig, MatchOutcome, MsdId, SelectionPolicy, SurveyDataset, SurveyRecord,
};

fn at(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + Duration::seconds(secs)
}

fn record(chainage: f64, lane: Lane, secs: i64) -> SurveyRecord {
    SurveyRecord {
        chainage,
        lane,
        timestamp: at(secs),
        payload: BTreeMap::new(),
    }
}

fn dataset(name: &str, records: Vec<SurveyRecord>) -> SurveyDataset {
    let mut out = SurveyDataset::new(name, Vec::new());
    for r in records {
        out.push(r);
    }
    out
}

fn config(chainage: f64, time_secs: i64) -> MatchConfig {
    MatchConfig {
        chainage_tolerance: chainage,
        time_tolerance_secs: time_secs,
        ..MatchConfig::default()
    }
}

/// Two candidates inside both tolerances: the lower combined
/// chainage+time distance wins even though the other is closer in space.
#[test]
fn nearest_picks_lowest_combined_distance() {
    let msd = dataset("MSD", vec![record(100.0, Lane::L1, 0)]);
    let lmd = dataset(
        "LMD",
        vec![
            record(101.0, Lane::L1, 5), // spatial 1 + time 5 = 6
            record(103.0, Lane::L1, 2), // spatial 3 + time 2 = 5
        ],
    );

    let run = run_match(&msd, &lmd, &config(5.0, 10), &RunControl::new()).unwrap();
    assert_eq!(
        run.association.outcome(MsdId::new(0)).unwrap().lmd(),
        Some(LmdId::new(1))
    );
    assert_eq!(run.report.matched, 1);
}

/// Tightening the time tolerance removes the slower candidate from the
/// candidate set entirely; the outcome is unchanged here but for the
/// reduced set.
#[test]
fn time_tolerance_prunes_candidates() {
    let msd = dataset("MSD", vec![record(100.0, Lane::L1, 0)]);
    let lmd = dataset(
        "LMD",
        vec![record(101.0, Lane::L1, 5), record(103.0, Lane::L1, 2)],
    );

    let run = run_match(&msd, &lmd, &config(5.0, 2), &RunControl::new()).unwrap();
    assert_eq!(
        run.association.outcome(MsdId::new(0)).unwrap().lmd(),
        Some(LmdId::new(1))
    );
}

/// Two MSD records both nearest to a single LMD record: the lower score
/// claims it, the loser is tagged rather than silently dropped.
#[test]
fn contended_lmd_goes_to_lower_score() {
    let msd = dataset(
        "MSD",
        vec![record(100.0, Lane::L1, 0), record(100.4, Lane::L1, 0)],
    );
    let lmd = dataset("LMD", vec![record(100.1, Lane::L1, 0)]);
    let mut cfg = config(5.0, 10);
    cfg.selection_policy = SelectionPolicy::NearestUniqueLmd;

    let run = run_match(&msd, &lmd, &cfg, &RunControl::new()).unwrap();
    assert_eq!(
        run.association.outcome(MsdId::new(0)).unwrap().lmd(),
        Some(LmdId::new(0))
    );
    assert_eq!(
        run.association.outcome(MsdId::new(1)),
        Some(&MatchOutcome::LostContention)
    );
    assert_eq!(run.report.unmatched_lost_contention, 1);
}

#[test]
fn empty_lmd_reports_every_msd_as_no_candidate() {
    let msd = dataset(
        "MSD",
        vec![record(100.0, Lane::L1, 0), record(200.0, Lane::R1, 0)],
    );
    let lmd = dataset("LMD", vec![]);

    let run = run_match(&msd, &lmd, &config(5.0, 10), &RunControl::new()).unwrap();
    assert_eq!(run.report.unmatched_no_candidate, 2);
    assert_eq!(run.report.matched, 0);
    for (_, outcome) in run.association.iter() {
        assert_eq!(outcome, &MatchOutcome::NoCandidate);
    }
}

#[test]
fn lane_mismatch_excludes_candidates_unless_disabled() {
    let msd = dataset("MSD", vec![record(100.0, Lane::L1, 0)]);
    let lmd = dataset("LMD", vec![record(100.0, Lane::R1, 0)]);

    let strict = run_match(&msd, &lmd, &config(5.0, 10), &RunControl::new()).unwrap();
    assert_eq!(strict.report.matched, 0);

    let mut relaxed = config(5.0, 10);
    relaxed.require_lane_match = false;
    let run = run_match(&msd, &lmd, &relaxed, &RunControl::new()).unwrap();
    assert_eq!(run.report.matched, 1);
}

#[test]
fn invalid_config_fails_before_matching() {
    let msd = dataset("MSD", vec![record(100.0, Lane::L1, 0)]);
    let lmd = dataset("LMD", vec![record(100.0, Lane::L1, 0)]);

    let err = run_match(&msd, &lmd, &config(-1.0, 10), &RunControl::new()).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn non_finite_chainage_is_excluded_and_counted() {
    let msd = dataset(
        "MSD",
        vec![record(100.0, Lane::L1, 0), record(f64::NAN, Lane::L1, 0)],
    );
    let lmd = dataset("LMD", vec![record(100.0, Lane::L1, 0)]);

    let run = run_match(&msd, &lmd, &config(5.0, 10), &RunControl::new()).unwrap();
    assert_eq!(run.report.invalid_msd, 1);
    assert_eq!(run.report.matched, 1);
    assert!(run.association.outcome(MsdId::new(1)).is_none());
    assert_eq!(
        run.report.matched
            + run.report.unmatched_no_candidate
            + run.report.unmatched_lost_contention
            + run.report.invalid_msd,
        run.report.total_msd
    );
}

#[test]
fn cancellation_aborts_without_partial_association() {
    let msd = dataset("MSD", vec![record(100.0, Lane::L1, 0)]);
    let lmd = dataset("LMD", vec![record(100.0, Lane::L1, 0)]);
    let control = RunControl {
        cancel: CancelToken::new(),
        ..RunControl::new()
    };
    control.cancel.cancel();

    let err = run_match(&msd, &lmd, &config(5.0, 10), &control).unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
}

#[test]
fn reruns_produce_identical_associations() {
    let msd = dataset(
        "MSD",
        (0..50)
            .map(|i| record(100.0 + f64::from(i) * 3.0, Lane::L1, i64::from(i)))
            .collect(),
    );
    let lmd = dataset(
        "LMD",
        (0..80)
            .map(|i| record(99.0 + f64::from(i) * 2.0, Lane::L1, i64::from(i % 20)))
            .collect(),
    );
    let mut cfg = config(5.0, 10);
    cfg.selection_policy = SelectionPolicy::NearestUniqueLmd;

    let first = run_match(&msd, &lmd, &cfg, &RunControl::new()).unwrap();
    let second = run_match(&msd, &lmd, &cfg, &RunControl::new()).unwrap();
    assert_eq!(first.association, second.association);
    assert_eq!(first.report, second.report);
}

#[test]
fn progress_counts_every_valid_msd_record() {
    let msd = dataset(
        "MSD",
        (0..10).map(|i| record(f64::from(i), Lane::L1, 0)).collect(),
    );
    let lmd = dataset("LMD", vec![record(0.0, Lane::L1, 0)]);
    let control = RunControl::new();

    run_match(&msd, &lmd, &config(5.0, 10), &control).unwrap();
    assert_eq!(control.progress.done(), 10);
}
