use serde::{Deserialize, Serialize};

use crate::cell::{Cell, HeaderCell, InputCell};
use crate::error::{Result, TableError};

/// Loosely shaped input: optional string headings plus rows of input cells.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataOption {
    pub headings: Option<Vec<String>>,
    pub data: Option<Vec<Vec<InputCell>>>,
}

/// Input already in normalized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub headings: Vec<HeaderCell>,
    pub data: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableInput {
    Raw(DataOption),
    Shaped(TableData),
}

impl From<DataOption> for TableInput {
    fn from(value: DataOption) -> Self {
        Self::Raw(value)
    }
}

impl From<TableData> for TableInput {
    fn from(value: TableData) -> Self {
        Self::Shaped(value)
    }
}

/// Immutable row storage in original insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    headings: Vec<HeaderCell>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headings: Vec<HeaderCell>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        validate_row_widths(headings.len(), &rows, 0)?;
        Ok(Self { headings, rows })
    }

    pub fn headings(&self) -> &[HeaderCell] {
        &self.headings
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headings.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Cells of one column in row order.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |cells| cells.get(column))
    }

    /// Appends rows after checking every width; nothing is appended on error.
    pub fn append_rows(&mut self, rows: Vec<Vec<Cell>>) -> Result<()> {
        validate_row_widths(self.column_count(), &rows, self.rows.len())?;
        self.rows.extend(rows);
        Ok(())
    }

    /// Mutable access to one column's cells, used only when a column's
    /// resolved type changes how its cells are stored.
    pub fn column_cells_mut(&mut self, column: usize) -> impl Iterator<Item = &mut Cell> {
        self.rows
            .iter_mut()
            .filter_map(move |cells| cells.get_mut(column))
    }
}

/// Checks that every row has `expected` cells. `offset` is the absolute
/// index of the first row, used in the error.
pub fn validate_row_widths(expected: usize, rows: &[Vec<Cell>], offset: usize) -> Result<()> {
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(TableError::ColumnCountMismatch {
                row: offset + idx,
                expected,
                found: row.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headings(n: usize) -> Vec<HeaderCell> {
        (0..n).map(|i| HeaderCell::new(format!("H{i}"))).collect()
    }

    #[test]
    fn rejects_short_rows() {
        let err = Table::new(headings(2), vec![vec![Cell::new("a")]]).unwrap_err();
        assert_eq!(
            err,
            TableError::ColumnCountMismatch {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn append_is_all_or_nothing() {
        let mut table = Table::new(headings(1), vec![vec![Cell::new("a")]]).unwrap();
        let err = table
            .append_rows(vec![vec![Cell::new("b")], vec![]])
            .unwrap_err();
        assert!(matches!(err, TableError::ColumnCountMismatch { row: 2, .. }));
        assert_eq!(table.row_count(), 1);
    }
}
