//! Free-text search and column filters over row-index sequences.
//!
//! Neither operation reorders rows: the output is always a subsequence of
//! the input.

use tabula_model::{ColumnFilter, ColumnSettings, Result, Table, TableError};

use crate::collate::Collator;

/// A search term prepared for matching against a set of columns.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    words: Vec<String>,
}

impl SearchQuery {
    /// Splits `term` on `separator` when given; otherwise the whole trimmed
    /// term is a single word.
    pub fn new(term: &str, separator: Option<&str>) -> Self {
        let words = match separator {
            Some(separator) if !separator.is_empty() => term
                .split(separator)
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(str::to_string)
                .collect(),
            _ => {
                let term = term.trim();
                if term.is_empty() {
                    Vec::new()
                } else {
                    vec![term.to_string()]
                }
            }
        };
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

struct SearchColumn {
    index: usize,
    collator: Collator,
    words: Vec<String>,
}

/// Rows where every word of `query` is a substring of the display text of
/// at least one of `columns`. Matching follows each column's collation
/// sensitivity and punctuation handling. An empty query keeps every row.
pub fn search(
    table: &Table,
    rows: &[usize],
    query: &SearchQuery,
    columns: &[&ColumnSettings],
) -> Vec<usize> {
    if query.is_empty() {
        return rows.to_vec();
    }
    let prepared: Vec<SearchColumn> = columns
        .iter()
        .map(|settings| {
            let collator = Collator::root(&settings.collation);
            let words = query.words.iter().map(|word| collator.fold(word)).collect();
            SearchColumn {
                index: settings.index,
                collator,
                words,
            }
        })
        .collect();

    rows.iter()
        .copied()
        .filter(|&row| {
            let folded: Vec<Option<String>> = prepared
                .iter()
                .map(|column| {
                    table
                        .cell(row, column.index)
                        .map(|cell| column.collator.fold(&cell.display_text()))
                })
                .collect();
            (0..query.words.len()).all(|word| {
                prepared.iter().zip(&folded).any(|(column, text)| {
                    text.as_ref()
                        .is_some_and(|text| text.contains(column.words[word].as_str()))
                })
            })
        })
        .collect()
}

/// Rows matching every filter. Filters naming a column outside the table,
/// or whose predicate fails, are rejected with `InvalidFilter`.
pub fn apply_filters(table: &Table, rows: &[usize], filters: &[ColumnFilter]) -> Result<Vec<usize>> {
    for filter in filters {
        check_filter_column(table, filter.column)?;
    }
    if filters.is_empty() {
        return Ok(rows.to_vec());
    }
    let mut matched = Vec::with_capacity(rows.len());
    'rows: for &row in rows {
        for filter in filters {
            let Some(cell) = table.cell(row, filter.column) else {
                continue 'rows;
            };
            let keep = filter
                .matches(cell)
                .map_err(|message| TableError::invalid_filter(filter.column, message))?;
            if !keep {
                continue 'rows;
            }
        }
        matched.push(row);
    }
    Ok(matched)
}

pub fn check_filter_column(table: &Table, column: usize) -> Result<()> {
    if column >= table.column_count() {
        return Err(TableError::invalid_filter(
            column,
            format!(
                "column index out of range (table has {} columns)",
                table.column_count()
            ),
        ));
    }
    Ok(())
}
