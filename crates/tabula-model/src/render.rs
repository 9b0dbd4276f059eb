//! Formatting hooks supplied by the caller.
//!
//! The engine stores these and hands them, together with the cells of the
//! current view, to whatever renders the table. It never calls them itself.

use std::fmt;

use crate::cell::Cell;

/// Per-column cell formatter. Returning `None` keeps the cell's display text.
pub trait CellRender: Send + Sync {
    fn render(&self, cell: &Cell, row: usize, column: usize) -> Option<String>;
}

impl<F> CellRender for F
where
    F: Fn(&Cell, usize, usize) -> Option<String> + Send + Sync,
{
    fn render(&self, cell: &Cell, row: usize, column: usize) -> Option<String> {
        self(cell, row, column)
    }
}

impl fmt::Debug for dyn CellRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellRender")
    }
}

/// Whole-row formatter, applied after the cell formatters. `rendered` holds
/// the text of each visible cell and may be rewritten in place.
pub trait RowRender: Send + Sync {
    fn render(&self, cells: &[Cell], row: usize, rendered: &mut Vec<String>);
}

impl<F> RowRender for F
where
    F: Fn(&[Cell], usize, &mut Vec<String>) + Send + Sync,
{
    fn render(&self, cells: &[Cell], row: usize, rendered: &mut Vec<String>) {
        self(cells, row, rendered);
    }
}

impl fmt::Debug for dyn RowRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowRender")
    }
}

/// Which output a [`TableRender`] is shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRenderKind {
    /// The page of rows.
    Main,
    /// Every matched row, for printing.
    Print,
    /// The heading row alone.
    Header,
    /// The empty-state message in place of rows.
    Message,
}

/// Table text after the cell and row formatters, before it is drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTable {
    pub headings: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Whole-table formatter, applied last. It may rewrite headings and rows,
/// add or drop either, or clear them.
pub trait TableRender: Send + Sync {
    fn render(&self, table: &mut RenderedTable, kind: TableRenderKind);
}

impl<F> TableRender for F
where
    F: Fn(&mut RenderedTable, TableRenderKind) + Send + Sync,
{
    fn render(&self, table: &mut RenderedTable, kind: TableRenderKind) {
        self(table, kind);
    }
}

impl fmt::Debug for dyn TableRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TableRender")
    }
}
