//! Sorting, filtering, search, and paging over normalized tables.
//!
//! The free functions work on row-index sequences and never modify the
//! table; [`DataTable`] keeps the current sort, search, filters, and page
//! of one dataset and recomputes them on every change.

pub mod collate;
pub mod compare;
pub mod datatable;
pub mod filter;
pub mod pager;
pub mod sort;
pub mod view;

pub use collate::{CollationKey, Collator};
pub use compare::{Comparator, SortKey, compare};
pub use datatable::DataTable;
pub use filter::{SearchQuery, apply_filters, check_filter_column, search};
pub use pager::{
    PageMarker, PageSlice, PagerItem, PagerOptions, page_count, page_markers, pager_items,
    paginate, truncate_pages,
};
pub use sort::{ensure_sortable, original_order, sort_rows};
pub use view::{InfoParts, TableView, ViewColumn, ViewMessage, ViewRow, format_info};
