//! CSV loading into [`DataOption`] input.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

use tabula_model::{DataOption, InputCell};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a CSV file whose first non-blank record holds the headings.
///
/// Blank records are skipped. Short records are padded with empty cells and
/// long ones truncated to the heading count, so every row has one cell per
/// heading. Cells are passed on as text; typing happens when the table is
/// built.
pub fn read_csv_data(path: &Path) -> Result<DataOption> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let data = collect_records(reader, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        rows = data.data.as_ref().map_or(0, Vec::len),
        "loaded csv"
    );
    Ok(data)
}

/// Same as [`read_csv_data`] for any reader; `label` names the source in
/// error messages.
pub fn parse_csv_data<R: Read>(input: R, label: &str) -> Result<DataOption> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    collect_records(reader, label)
}

fn collect_records<R: Read>(mut reader: csv::Reader<R>, label: &str) -> Result<DataOption> {
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {label}"))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut records = raw_rows.into_iter();
    let Some(header_row) = records.next() else {
        return Ok(DataOption {
            headings: Some(Vec::new()),
            data: Some(Vec::new()),
        });
    };
    let headings: Vec<String> = header_row
        .iter()
        .map(|value| normalize_header(value))
        .collect();
    let rows = records
        .map(|record| {
            (0..headings.len())
                .map(|idx| InputCell::Text(record.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect();
    Ok(DataOption {
        headings: Some(headings),
        data: Some(rows),
    })
}
