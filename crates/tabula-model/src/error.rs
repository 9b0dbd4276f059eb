use std::fmt;

use thiserror::Error;

/// Error raised while normalizing a single input cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("structured cell is missing `data`")]
    MissingData,
}

/// Why a sort request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsortableReason {
    /// The column is configured with `sortable = false`.
    Disabled,
    /// The column index does not exist.
    OutOfRange { columns: usize },
}

impl fmt::Display for UnsortableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("column is not sortable"),
            Self::OutOfRange { columns } => {
                write!(f, "column index out of range (table has {columns} columns)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("invalid cell at row {row}, column {column}: {source}")]
    InvalidCell {
        row: usize,
        column: usize,
        #[source]
        source: CellError,
    },
    #[error("row {row} has {found} cells, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cannot sort by column {column}: {reason}")]
    UnsortableColumn {
        column: usize,
        reason: UnsortableReason,
    },
    #[error("invalid filter on column {column}: {message}")]
    InvalidFilter { column: usize, message: String },
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl TableError {
    pub fn invalid_filter(column: usize, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            column,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
