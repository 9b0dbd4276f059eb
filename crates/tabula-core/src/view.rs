//! Output handed to the rendering layer.

use std::sync::Arc;

use tabula_model::{Cell, ColumnSettings, HeaderCell, RowRender, SortDirection, TableRender};

use crate::pager::PagerItem;

/// A visible column.
#[derive(Debug, Clone)]
pub struct ViewColumn<'a> {
    pub index: usize,
    pub heading: &'a HeaderCell,
    pub settings: &'a ColumnSettings,
    /// Direction when the table is sorted by this column.
    pub sort: Option<SortDirection>,
}

/// A row of the current page with the cells of the visible columns.
#[derive(Debug, Clone)]
pub struct ViewRow<'a> {
    /// Index into the table's row storage.
    pub index: usize,
    /// Every cell of the row, hidden columns included.
    pub all_cells: &'a [Cell],
    pub cells: Vec<&'a Cell>,
}

/// Why the page has no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMessage {
    /// The table holds no rows.
    NoRows(String),
    /// Search or filters removed every row.
    NoResults(String),
}

impl ViewMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::NoRows(text) | Self::NoResults(text) => text,
        }
    }
}

/// One page of the table, ready to render.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    pub columns: Vec<ViewColumn<'a>>,
    pub rows: Vec<ViewRow<'a>>,
    pub page_count: usize,
    pub current_page: usize,
    /// Rows left after search and filters, across all pages.
    pub matched_rows: usize,
    pub total_rows: usize,
    pub pager: Vec<PagerItem>,
    pub info: String,
    pub message: Option<ViewMessage>,
    pub row_render: Option<&'a Arc<dyn RowRender>>,
    pub table_render: Option<&'a Arc<dyn TableRender>>,
}

/// Positions of a page within the matched rows, for the info label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoParts {
    pub start: usize,
    pub end: usize,
    pub rows: usize,
    pub page: usize,
    pub pages: usize,
}

/// Fills `{start}`, `{end}`, `{rows}`, `{page}`, and `{pages}` in `template`.
pub fn format_info(template: &str, parts: InfoParts) -> String {
    template
        .replace("{start}", &parts.start.to_string())
        .replace("{end}", &parts.end.to_string())
        .replace("{rows}", &parts.rows.to_string())
        .replace("{pages}", &parts.pages.to_string())
        .replace("{page}", &parts.page.to_string())
}
