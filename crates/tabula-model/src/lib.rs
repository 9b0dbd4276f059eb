//! Data model for the tabula table engine: cells, tables, configuration,
//! and the error taxonomy shared by every crate in the workspace.

#![deny(unsafe_code)]

pub mod cell;
pub mod error;
pub mod filter;
pub mod markup;
pub mod options;
pub mod render;
pub mod settings;
pub mod table;

pub use cell::{Cell, HeaderCell, InputCell, RawValue, SortValue, ValueKind};
pub use error::{CellError, Result, TableError, UnsortableReason};
pub use filter::{ColumnFilter, FilterLiteral, FilterTerm, Predicate};
pub use markup::{ElementNode, MarkupNode, flatten_text, parse_fragment};
pub use options::{
    CaseFirst, ColumnOption, ColumnSelect, ColumnType, LabelOptions, PageSizeKeyword,
    PageSizeOption, PerPageOption, Sensitivity, SortDirection, TableOptions,
};
pub use render::{CellRender, RenderedTable, RowRender, TableRender, TableRenderKind};
pub use settings::{
    CollationOptions, ColumnSettings, Labels, PageSize, PerPageEntry, SortState, TableConfig,
};
pub use table::{DataOption, Table, TableData, TableInput, validate_row_widths};
