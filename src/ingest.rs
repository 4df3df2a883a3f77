use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{MonitorError, Result, REQUIRED_COLUMNS};
use crate::export::DERIVED_COLUMNS;
use crate::models::HealthRecord;

/// Opens a CSV source, treating `-` as standard input.
pub fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

pub fn load_records<R: Read>(source: R) -> Result<Vec<HealthRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers = reader.headers()?.clone();

    let position = |name: &str| headers.iter().position(|header| header == name);
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| position(**name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(MonitorError::MissingColumns(missing));
    }

    let [id_idx, hr_idx, stress_idx, sleep_idx] =
        REQUIRED_COLUMNS.map(|name| position(name).unwrap_or_default());
    let mut extra_columns: Vec<(usize, String)> = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if [id_idx, hr_idx, stress_idx, sleep_idx].contains(&idx) {
            continue;
        }
        if DERIVED_COLUMNS.contains(&name) {
            log::debug!("column {name} will be replaced by the assessment");
            continue;
        }
        if REQUIRED_COLUMNS.contains(&name) || extra_columns.iter().any(|(_, seen)| seen == name) {
            log::warn!("dropping duplicate column {name}");
            continue;
        }
        extra_columns.push((idx, name.to_string()));
    }

    let mut records = Vec::new();
    for (offset, result) in reader.records().enumerate() {
        let row = result?;
        let line = offset + 1;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let record = HealthRecord {
            id: cell(id_idx).to_string(),
            heart_rate: parse_vital(line, "heart_rate", cell(hr_idx))?,
            stress: parse_vital(line, "stress", cell(stress_idx))?,
            sleep_hours: parse_vital(line, "sleep_hours", cell(sleep_idx))?,
            extra: extra_columns
                .iter()
                .map(|(idx, name)| (name.clone(), cell(*idx).to_string()))
                .collect(),
        };
        warn_out_of_range(line, &record);
        records.push(record);
    }

    log::info!(
        "Loaded {} records ({} pass-through columns)",
        records.len(),
        extra_columns.len()
    );
    Ok(records)
}

fn parse_vital(row: usize, column: &'static str, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MonitorError::InvalidValue {
            row,
            column,
            value: raw.to_string(),
        }),
    }
}

fn warn_out_of_range(row: usize, record: &HealthRecord) {
    if record.heart_rate < 0.0 {
        log::warn!("row {row}: negative heart_rate {}", record.heart_rate);
    }
    if !(0.0..=10.0).contains(&record.stress) {
        log::warn!("row {row}: stress {} outside 0-10", record.stress);
    }
    if !(0.0..=24.0).contains(&record.sleep_hours) {
        log::warn!("row {row}: sleep_hours {} outside 0-24", record.sleep_hours);
    }
}

/// Writes a small demonstration data set covering every risk tier.
pub fn write_sample<W: Write>(out: W) -> Result<usize> {
    let rows = [
        ("E001", "95", "8", "4", "Operations"),
        ("E002", "72", "3", "7.5", "Engineering"),
        ("E003", "91", "3", "8", "Engineering"),
        ("E004", "68", "8.5", "6", "Sales"),
        ("E005", "90", "7", "5", "Support"),
        ("E006", "101", "9", "6.5", "Operations"),
        ("E007", "64", "2", "4.5", "Finance"),
        ("E008", "78", "5", "7", "Sales"),
    ];

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["id", "heart_rate", "stress", "sleep_hours", "department"])?;
    for (id, heart_rate, stress, sleep_hours, department) in rows {
        writer.write_record([id, heart_rate, stress, sleep_hours, department])?;
    }
    writer.flush()?;

    Ok(rows.len())
}
