//! Column-aware cell comparison.
//!
//! Comparisons always have ascending semantics; direction belongs to the
//! sort engine. Cells are turned into [`SortKey`]s once so sorting does not
//! re-parse values on every comparison.

use std::cmp::Ordering;
use std::collections::HashMap;

use tabula_ingest::{DateFormat, parse_bool, parse_date, parse_number};
use tabula_model::{Cell, ColumnSettings, ColumnType, RawValue, SortValue};

use crate::collate::{CollationKey, Collator};

#[derive(Debug, Clone)]
enum KeyValue {
    Number(f64),
    Date(i64),
    Bool(bool),
    Text(CollationKey),
    /// Unparsable, NaN, or absent; after every other value.
    Missing,
}

impl KeyValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) | Self::Date(_) => 0,
            Self::Bool(_) => 1,
            Self::Text(_) => 2,
            Self::Missing => 3,
        }
    }
}

/// Precomputed ordering key of one cell under one column's settings.
#[derive(Debug, Clone)]
pub struct SortKey {
    sequence: Option<usize>,
    value: KeyValue,
}

impl SortKey {
    /// Key of a cell that does not exist.
    pub fn missing() -> Self {
        Self {
            sequence: None,
            value: KeyValue::Missing,
        }
    }
}

/// Comparator for one column.
#[derive(Debug, Clone)]
pub struct Comparator {
    kind: ColumnType,
    collator: Collator,
    date_format: Option<DateFormat>,
    sequence: HashMap<String, usize>,
}

impl Comparator {
    pub fn new(settings: &ColumnSettings) -> Self {
        let mut sequence = HashMap::with_capacity(settings.sort_sequence.len());
        for (position, value) in settings.sort_sequence.iter().enumerate() {
            sequence.entry(value.trim().to_string()).or_insert(position);
        }
        Self {
            kind: settings.kind,
            collator: Collator::new(&settings.collation),
            date_format: settings.format.as_deref().map(DateFormat::new),
            sequence,
        }
    }

    /// Builds the key of `cell`. An explicit `order` replaces the value for
    /// both the sequence lookup and the typed comparison.
    pub fn key(&self, cell: &Cell) -> SortKey {
        let text = sort_text(cell);
        let sequence = if self.sequence.is_empty() {
            None
        } else {
            self.sequence.get(text.trim()).copied()
        };
        SortKey {
            sequence,
            value: self.value_key(cell, &text),
        }
    }

    fn value_key(&self, cell: &Cell, text: &str) -> KeyValue {
        let number = match (&cell.order, &cell.value) {
            (Some(SortValue::Number(number)), _) => Some(*number),
            (None, RawValue::Number(number)) => Some(*number),
            _ => None,
        };
        match self.kind {
            ColumnType::Number => match number.or_else(|| parse_number(text)) {
                Some(number) if number.is_finite() => KeyValue::Number(number),
                _ => KeyValue::Missing,
            },
            ColumnType::Date => match number {
                Some(millis) if millis.is_finite() => KeyValue::Date(millis as i64),
                Some(_) => KeyValue::Missing,
                None => parse_date(text, self.date_format.as_ref())
                    .map_or(KeyValue::Missing, KeyValue::Date),
            },
            ColumnType::Boolean => match (&cell.order, &cell.value) {
                (None, RawValue::Bool(flag)) => KeyValue::Bool(*flag),
                _ => parse_bool(text).map_or(KeyValue::Missing, KeyValue::Bool),
            },
            ColumnType::String | ColumnType::Html | ColumnType::Other => match number {
                Some(number) if cell.order.is_some() && number.is_finite() => {
                    KeyValue::Number(number)
                }
                _ => KeyValue::Text(self.collator.key(text)),
            },
        }
    }

    pub fn compare_keys(&self, a: &SortKey, b: &SortKey) -> Ordering {
        match (a.sequence, b.sequence) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.compare_values(&a.value, &b.value),
        }
    }

    fn compare_values(&self, a: &KeyValue, b: &KeyValue) -> Ordering {
        match (a, b) {
            (KeyValue::Number(x), KeyValue::Number(y)) => x.total_cmp(y),
            (KeyValue::Date(x), KeyValue::Date(y)) => x.cmp(y),
            (KeyValue::Bool(x), KeyValue::Bool(y)) => x.cmp(y),
            (KeyValue::Text(x), KeyValue::Text(y)) => self.collator.compare_keys(x, y),
            _ => a.rank().cmp(&b.rank()),
        }
    }

    pub fn compare(&self, a: &Cell, b: &Cell) -> Ordering {
        self.compare_keys(&self.key(a), &self.key(b))
    }
}

/// Compares two cells of a column with ascending semantics.
pub fn compare(a: &Cell, b: &Cell, settings: &ColumnSettings) -> Ordering {
    Comparator::new(settings).compare(a, b)
}

/// Text a cell sorts by: its `order` when present, else its value (markup
/// flattened), never the display override.
fn sort_text(cell: &Cell) -> String {
    match &cell.order {
        Some(order) => order.to_text().into_owned(),
        None => cell.value.to_text().into_owned(),
    }
}
