//! End-to-end merge command over real CSV fixtures.

use std::path::PathBuf;

use rsm_cli::cli::MergeArgs;
use rsm_cli::commands::run_merge;

fn args(msd: PathBuf, lmd: PathBuf) -> MergeArgs {
    MergeArgs {
        msd,
        lmd,
        output_dir: None,
        config: None,
        chainage_tolerance: None,
        time_tolerance: None,
        policy: None,
        no_lane_match: false,
        w_spatial: None,
        w_time: None,
        lmd_columns: None,
        dry_run: false,
    }
}

fn write_fixtures(dir: &std::path::Path) -> (PathBuf, PathBuf) {
    let msd = dir.join("msd.csv");
    std::fs::write(
        &msd,
        "RoadName,Lane,Chainage,TestDateUTC,IRI\n\
         A1,L1,100.0,01/03/24 12:00:00,2.1\n\
         A1,L1,500.0,01/03/24 12:05:00,2.6\n",
    )
    .unwrap();
    let lmd = dir.join("TSD_V1.0.0.17.csv");
    std::fs::write(
        &lmd,
        "Lane,Chain,TestDateUTC,tsdSlope3000,Filename\n\
         L1,101.0,2024-03-01T12:00:02.0Z,55,run1.bin\n\
         L1,900.0,2024-03-01T12:30:00.0Z,77,run2.bin\n",
    )
    .unwrap();
    (msd, lmd)
}

#[test]
fn merge_writes_versioned_csv_with_lmd_columns() {
    let dir = tempfile::tempdir().unwrap();
    let (msd, lmd) = write_fixtures(dir.path());
    let mut args = args(msd, lmd);
    args.lmd_columns = Some(vec!["tsdSlope3000".to_string(), "Filename".to_string()]);

    let result = run_merge(&args).unwrap();
    assert_eq!(result.report.total_msd, 2);
    assert_eq!(result.report.matched, 1);
    assert_eq!(result.report.unmatched_no_candidate, 1);

    let path = result.output_path.unwrap();
    assert!(path.ends_with("LMD-MSD_Merged/LMD_MSD_Merged_V17.csv"));
    let written = std::fs::read_to_string(&path).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next().unwrap(),
        "RoadName,Lane,Chainage,TestDateUTC,IRI,time_diff_seconds,chainage_diff_meters,tsdSlope3000,Filename"
    );
    assert_eq!(lines.next().unwrap(), "A1,L1,100.0,01/03/24 12:00:00,2.1,2,1,55,run1.bin");
    // Unmatched row survives with empty LMD cells.
    assert_eq!(lines.next().unwrap(), "A1,L1,500.0,01/03/24 12:05:00,2.6,,,,");
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let (msd, lmd) = write_fixtures(dir.path());
    let mut args = args(msd, lmd);
    args.dry_run = true;

    let result = run_merge(&args).unwrap();
    assert!(result.output_path.is_none());
    assert!(!dir.path().join("LMD-MSD_Merged").exists());
    assert_eq!(result.report.matched, 1);
}

#[test]
fn config_file_settings_are_overridden_by_flags() {
    let dir = tempfile::tempdir().unwrap();
    let (msd, lmd) = write_fixtures(dir.path());
    let profile = dir.path().join("profile.json");
    std::fs::write(&profile, r#"{"matching": {"time_tolerance_secs": 1}}"#).unwrap();

    // With the 1s tolerance from the file, the 2s-apart pair cannot match.
    let mut strict = args(msd.clone(), lmd.clone());
    strict.config = Some(profile.clone());
    strict.dry_run = true;
    let result = run_merge(&strict).unwrap();
    assert_eq!(result.report.matched, 0);

    // The flag wins over the file.
    let mut relaxed = args(msd, lmd);
    relaxed.config = Some(profile);
    relaxed.time_tolerance = Some(10);
    relaxed.dry_run = true;
    let result = run_merge(&relaxed).unwrap();
    assert_eq!(result.report.matched, 1);
}

#[test]
fn invalid_configuration_fails_before_matching() {
    let dir = tempfile::tempdir().unwrap();
    let (msd, lmd) = write_fixtures(dir.path());
    let mut args = args(msd, lmd);
    args.chainage_tolerance = Some(-2.0);

    let err = run_merge(&args).unwrap_err();
    assert!(format!("{err:#}").contains("chainage tolerance"));
}
