//! `tabula` subcommands. Each returns the text to print.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use tabula_core::DataTable;
use tabula_ingest::read_csv_data;
use tabula_model::TableOptions;

use crate::query::ViewQuery;
use crate::render::{columns_table, render_view};

/// Reads JSON table options; no file means defaults.
pub fn load_options(path: Option<&Path>) -> Result<TableOptions> {
    let Some(path) = path else {
        return Ok(TableOptions::default());
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("read options: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse options: {}", path.display()))
}

pub fn load_table(csv: &Path, config: Option<&Path>) -> Result<DataTable> {
    let options = load_options(config)?;
    let data = read_csv_data(csv)?;
    DataTable::new(data, &options).with_context(|| format!("build table: {}", csv.display()))
}

pub fn run_view(csv: &Path, config: Option<&Path>, query: &ViewQuery) -> Result<String> {
    let span = info_span!("view", csv = %csv.display());
    let _guard = span.enter();
    let mut table = load_table(csv, config)?;
    query.apply(&mut table)?;
    info!(
        rows = table.table().row_count(),
        matched = table.visible_rows().len(),
        page = table.current_page(),
        pages = table.page_count(),
        "view ready"
    );
    Ok(render_view(&table.view()))
}

pub fn run_columns(csv: &Path, config: Option<&Path>) -> Result<String> {
    let span = info_span!("columns", csv = %csv.display());
    let _guard = span.enter();
    let table = load_table(csv, config)?;
    Ok(columns_table(&table).to_string())
}
