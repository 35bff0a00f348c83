use assert_cmd::cargo::cargo_bin_cmd;
use pulse_lib::signal::Events;
use std::{error::Error, fs};
use tempfile::tempdir;

#[test]
fn find_peaks_reports_spike_indices() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("spikes.csv");
    let mut body = String::from("Time,ECG,Lead\n");
    for i in 0..500 {
        let value = if [90, 200, 310].contains(&i) { 2.0 } else { 0.0 };
        body.push_str(&format!("{},{},0\n", i as f64 * 0.004, value));
    }
    fs::write(&path, body)?;

    let mut cmd = cargo_bin_cmd!("pulse");
    cmd.args([
        "find-peaks",
        "--input",
        path.to_str().expect("utf8 path"),
        "--min-distance",
        "40",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let events: Events = serde_json::from_slice(&output)?;
    assert_eq!(events.indices, vec![90, 200, 310]);
    Ok(())
}

#[test]
fn find_peaks_threshold_is_respected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("spikes.csv");
    let mut body = String::from("Time,ECG\n");
    for i in 0..300 {
        let value = match i {
            100 => 1.0,
            200 => 3.0,
            _ => 0.0,
        };
        body.push_str(&format!("{},{}\n", i as f64 * 0.01, value));
    }
    fs::write(&path, body)?;

    let mut cmd = cargo_bin_cmd!("pulse");
    cmd.args([
        "find-peaks",
        "--input",
        path.to_str().expect("utf8 path"),
        "--threshold",
        "1.5",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let events: Events = serde_json::from_slice(&output)?;
    assert_eq!(events.indices, vec![200]);
    Ok(())
}

#[test]
fn find_peaks_accepts_spacing_beyond_input() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("short.csv");
    fs::write(&path, "Time,ECG\n0.0,0.0\n0.01,1.0\n0.02,0.0\n")?;

    let mut cmd = cargo_bin_cmd!("pulse");
    cmd.args([
        "find-peaks",
        "--input",
        path.to_str().expect("utf8 path"),
        "--min-distance",
        &usize::MAX.to_string(),
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let events: Events = serde_json::from_slice(&output)?;
    assert!(events.indices.is_empty());
    Ok(())
}

#[test]
fn find_peaks_fails_on_missing_input() {
    let mut cmd = cargo_bin_cmd!("pulse");
    cmd.args(["find-peaks", "--input", "no/such/file.csv"]);
    cmd.assert().failure();
}
