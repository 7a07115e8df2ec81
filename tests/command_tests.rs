use interval_bucketer::aggregator::{Granularity, ZeroDurationPolicy};
use interval_bucketer::commands::{
    execute_batch, execute_convert, execute_export, validate_args, validate_series_file,
    BatchArgs, ConvertArgs, ExportArgs,
};
use interval_bucketer::output::{read_dataset, OutputOptions};
use std::fs;
use std::path::{Path, PathBuf};

const CALTECH_STYLE: &str = "\
sessionID,Start,End,Energy
s1,\"Wed, 25 Apr 2018 11:08:04 GMT\",\"Wed, 25 Apr 2018 13:20:10 GMT\",7.932
s2,\"Wed, 25 Apr 2018 13:45:39 GMT\",\"Wed, 25 Apr 2018 14:15:39 GMT\",2.0
";

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_convert_rfc2822_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "caltech.csv", CALTECH_STYLE);
    let output = dir.path().join("caltech_hourly.csv");

    let args = ConvertArgs {
        input,
        output: output.clone(),
        ..Default::default()
    };
    validate_args(&args).unwrap();
    let summary = execute_convert(args).unwrap();

    // 11:00 through 14:00
    assert_eq!(summary.bucket_count, 4);
    assert!((summary.total_quantity - 9.932).abs() < 1e-9);

    let text = fs::read_to_string(&output).unwrap();
    let first_rows: Vec<&str> = text.lines().take(2).collect();
    assert_eq!(first_rows[0], "Hour,Energy");
    assert!(first_rows[1].starts_with("2018-04-25 11:00:00,"));

    validate_series_file(output, Granularity::hourly(), &OutputOptions::default()).unwrap();
}

#[test]
fn test_convert_rejects_zero_duration_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(
        dir.path(),
        "events.csv",
        "Start,End,Energy\n2024-01-01 01:00:00,2024-01-01 01:00:00,1\n",
    );

    let mut args = ConvertArgs {
        input,
        output: dir.path().join("out.csv"),
        ..Default::default()
    };
    args.bucketing = args.bucketing.with_zero_duration(ZeroDurationPolicy::Reject);

    assert!(execute_convert(args).is_err());
}

#[test]
fn test_convert_empty_input_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "empty.csv", "Start,End,Energy\n");
    let output = dir.path().join("empty_hourly.csv");

    let summary = execute_convert(ConvertArgs {
        input,
        output: output.clone(),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(summary.bucket_count, 0);
    assert_eq!(fs::read_to_string(output).unwrap(), "Hour,Energy\n");
}

#[test]
fn test_batch_then_export() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "sap.csv",
        "Start,End,Energy\n2024-01-01 00:30:00,2024-01-01 01:30:00,10\n",
    );
    write_file(
        dir.path(),
        "boulder.csv",
        "Start,End,Energy\n2024-01-01 02:00:00,2024-01-01 02:30:00,1\n2024-01-01 04:15:00,2024-01-01 04:45:00,3\n",
    );

    let results = execute_batch(BatchArgs {
        datasets: vec!["sap".to_string(), "boulder".to_string()],
        input_dir: dir.path().to_path_buf(),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(results.len(), 2);

    let dataset = dir.path().join("dataset.json");
    let written = execute_export(ExportArgs {
        inputs: vec![
            dir.path().join("sap_hourly.csv"),
            dir.path().join("boulder_hourly.csv"),
        ],
        output: dataset.clone(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(written, 2);

    let entries = read_dataset(&dataset).unwrap();
    assert_eq!(entries[0].target, vec![5.0, 5.0]);
    assert_eq!(entries[1].target, vec![1.0, 0.0, 3.0]);
    assert_eq!(entries[1].feat_static_cat, vec![1]);
    assert_eq!(entries[1].start, "2024-01-01T02:00:00");
}
