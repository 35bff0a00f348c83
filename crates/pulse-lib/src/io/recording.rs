use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::path::Path;

use crate::signal::Signal;

pub const TIME_COLUMN: &str = "Time";
pub const ECG_COLUMN: &str = "ECG";

/// Load the `Time` and `ECG` columns of a CSV recording. Other columns are ignored.
pub fn read_recording_csv(path: &Path) -> Result<Signal> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);
    let headers = reader.headers().context("reading header")?.clone();
    let time_idx = locate_column(&headers, TIME_COLUMN)?;
    let ecg_idx = locate_column(&headers, ECG_COLUMN)?;

    let mut timestamps = Vec::new();
    let mut amplitudes = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading record {}", row + 1))?;
        timestamps.push(parse_cell(&record, time_idx, TIME_COLUMN, row)?);
        amplitudes.push(parse_cell(&record, ecg_idx, ECG_COLUMN, row)?);
    }
    Ok(Signal::new(timestamps, amplitudes))
}

/// Write a signal as a two-column `Time,ECG` CSV.
pub fn write_recording_csv(path: &Path, signal: &Signal) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record([TIME_COLUMN, ECG_COLUMN])?;
    for (t, v) in signal.timestamps.iter().zip(&signal.amplitudes) {
        writer.write_record([t.to_string(), v.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn locate_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("missing '{}' column", name))
}

fn parse_cell(record: &StringRecord, idx: usize, column: &str, row: usize) -> Result<f64> {
    let raw = record
        .get(idx)
        .with_context(|| format!("row {} has no '{}' value", row + 1, column))?;
    let value: f64 = raw
        .parse()
        .with_context(|| format!("row {} '{}' is not numeric: {}", row + 1, column, raw))?;
    if !value.is_finite() {
        anyhow::bail!("row {} '{}' is not finite: {}", row + 1, column, raw);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_named_columns_in_any_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rec.csv");
        fs::write(&path, "ECG, Extra ,Time\n0.5,x,0.0\n0.7,y,0.004\n-0.1,z,0.008\n").unwrap();
        let sig = read_recording_csv(&path).unwrap();
        assert_eq!(sig.timestamps, vec![0.0, 0.004, 0.008]);
        assert_eq!(sig.amplitudes, vec![0.5, 0.7, -0.1]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rec.csv");
        fs::write(&path, "Foo,Bar\n1,2\n").unwrap();
        let err = read_recording_csv(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing 'Time' column"));
    }

    #[test]
    fn non_numeric_and_non_finite_cells_are_errors() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        fs::write(&bad, "Time,ECG\n0.0,abc\n").unwrap();
        assert!(read_recording_csv(&bad).is_err());
        let nan = dir.path().join("nan.csv");
        fs::write(&nan, "Time,ECG\n0.0,NaN\n").unwrap();
        assert!(read_recording_csv(&nan).is_err());
    }

    #[test]
    fn empty_file_has_no_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        assert!(read_recording_csv(&path).is_err());
    }

    #[test]
    fn write_then_read_preserves_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sig = Signal::new(vec![0.0, 0.5, 1.0], vec![1.25, -3.5, 0.0]);
        write_recording_csv(&path, &sig).unwrap();
        assert_eq!(read_recording_csv(&path).unwrap(), sig);
    }
}
