//! Column type inference and settings resolution.

use tabula_model::{Cell, ColumnOption, ColumnSettings, ColumnType, RawValue, TableConfig};
use tracing::debug;

use crate::parse::{DateFormat, parse_date, parse_number};

/// Infers a column type from a sample of its cells.
///
/// Empty cells are ignored. A type is chosen when every remaining cell
/// satisfies it, in the order number, date, html, boolean; anything else
/// (including a sample with no non-empty cell) is a string column. Any
/// markup cell makes the column `html` unless it also reads as numbers or
/// dates.
pub fn infer_type<'a, I>(sample: I, format: Option<&DateFormat>) -> ColumnType
where
    I: IntoIterator<Item = &'a Cell>,
{
    let mut seen = 0usize;
    let mut any_markup = false;
    let mut numbers = true;
    let mut dates = true;
    let mut booleans = true;

    for cell in sample {
        any_markup |= cell.value.is_markup();
        let text = cell.display_text();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        seen += 1;
        if numbers && !reads_as_number(cell, text) {
            numbers = false;
        }
        if dates && parse_date(text, format).is_none() {
            dates = false;
        }
        if booleans && !matches!(cell.value, RawValue::Bool(_)) && text != "true" && text != "false"
        {
            booleans = false;
        }
    }

    if seen > 0 && numbers {
        ColumnType::Number
    } else if seen > 0 && dates {
        ColumnType::Date
    } else if any_markup {
        ColumnType::Html
    } else if seen > 0 && booleans {
        ColumnType::Boolean
    } else {
        ColumnType::String
    }
}

fn reads_as_number(cell: &Cell, text: &str) -> bool {
    match cell.value {
        RawValue::Number(number) => number.is_finite(),
        RawValue::Bool(_) => false,
        _ => parse_number(text).is_some(),
    }
}

/// Resolves the settings of column `index` from the merged column option,
/// the table configuration, and (when no type is configured) the sample.
pub fn resolve_column<'a, I>(
    index: usize,
    sample: I,
    option: &ColumnOption,
    config: &TableConfig,
) -> ColumnSettings
where
    I: IntoIterator<Item = &'a Cell>,
{
    let mut settings = ColumnSettings::new(index, config);
    match option.kind {
        Some(kind) => settings.kind = kind,
        None if config.data_convert => {
            let format = option.format.as_deref().map(DateFormat::new);
            settings.kind = infer_type(sample, format.as_ref());
            settings.inferred = true;
            debug!(column = index, kind = %settings.kind, "inferred column type");
        }
        None => {}
    }
    settings.format = option.format.clone();
    settings.sortable = option.sortable.unwrap_or(config.sortable);
    settings.searchable = option.searchable.unwrap_or(config.searchable);
    settings.hidden = option.hidden.unwrap_or(false);
    settings.collation = config.collation.overridden_by(option);
    settings.filter = option.filter.clone().unwrap_or_default();
    settings.sort = option.sort;
    settings.sort_sequence = option.sort_sequence.clone().unwrap_or_default();
    if let Some(cycle) = option.sort_cycle.as_ref().filter(|cycle| !cycle.is_empty()) {
        settings.sort_cycle = cycle.clone();
    }
    settings.render = option.render.clone();
    settings
}
