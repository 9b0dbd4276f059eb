//! Resolved configuration.

use std::num::NonZeroUsize;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::filter::FilterTerm;
use crate::options::{
    CaseFirst, ColumnOption, ColumnType, PageSizeKeyword, PageSizeOption, PerPageOption,
    Sensitivity, SortDirection, TableOptions,
};
use crate::render::{CellRender, RowRender, TableRender};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const DEFAULT_PER_PAGE_SELECT: [usize; 5] = [5, 10, 15, 20, 25];
pub const DEFAULT_PAGER_DELTA: usize = 2;
pub const DEFAULT_LOCALE: &str = "en";

/// String comparison and matching options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationOptions {
    pub locale: String,
    pub numeric: bool,
    pub case_first: CaseFirst,
    pub sensitivity: Sensitivity,
    pub ignore_punctuation: bool,
}

impl Default for CollationOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            numeric: true,
            case_first: CaseFirst::Off,
            sensitivity: Sensitivity::Base,
            ignore_punctuation: true,
        }
    }
}

impl CollationOptions {
    /// Column-level overrides layered on top of these options.
    #[must_use]
    pub fn overridden_by(&self, option: &ColumnOption) -> Self {
        Self {
            locale: option.locale.clone().unwrap_or_else(|| self.locale.clone()),
            numeric: option.numeric.unwrap_or(self.numeric),
            case_first: option.case_first.unwrap_or(self.case_first),
            sensitivity: option.sensitivity.unwrap_or(self.sensitivity),
            ignore_punctuation: option.ignore_punctuation.unwrap_or(self.ignore_punctuation),
        }
    }
}

/// Fully resolved settings of one column.
#[derive(Debug, Clone)]
pub struct ColumnSettings {
    pub index: usize,
    pub kind: ColumnType,
    /// Whether `kind` was inferred from the data rather than configured.
    pub inferred: bool,
    pub format: Option<String>,
    pub sortable: bool,
    pub searchable: bool,
    pub hidden: bool,
    pub collation: CollationOptions,
    pub filter: Vec<FilterTerm>,
    pub sort: Option<SortDirection>,
    pub sort_sequence: Vec<String>,
    pub sort_cycle: Vec<SortDirection>,
    pub render: Option<Arc<dyn CellRender>>,
}

impl ColumnSettings {
    /// String-typed settings with table defaults, before any column options.
    pub fn new(index: usize, config: &TableConfig) -> Self {
        Self {
            index,
            kind: ColumnType::String,
            inferred: false,
            format: None,
            sortable: config.sortable,
            searchable: config.searchable,
            hidden: false,
            collation: config.collation.clone(),
            filter: Vec::new(),
            sort: None,
            sort_sequence: Vec::new(),
            sort_cycle: vec![SortDirection::Asc, SortDirection::Desc],
            render: None,
        }
    }

    /// Searchable and visible.
    pub fn is_search_target(&self) -> bool {
        self.searchable && !self.hidden
    }
}

/// Rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    Rows(NonZeroUsize),
    All,
}

impl PageSize {
    pub fn rows(count: usize) -> Option<Self> {
        NonZeroUsize::new(count).map(Self::Rows)
    }

    fn from_count(count: i64) -> Self {
        usize::try_from(count)
            .ok()
            .and_then(Self::rows)
            .unwrap_or(Self::All)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Rows(NonZeroUsize::new(DEFAULT_PER_PAGE).unwrap_or(NonZeroUsize::MIN))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerPageEntry {
    pub label: String,
    pub size: PageSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub placeholder: String,
    pub per_page: String,
    pub no_rows: String,
    pub no_results: String,
    pub info: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            placeholder: "Search...".to_string(),
            per_page: "{select} entries per page".to_string(),
            no_rows: "No entries found".to_string(),
            no_results: "No results match your search query".to_string(),
            info: "Showing {start} to {end} of {rows} entries".to_string(),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// Table options merged against defaults.
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub columns: Vec<ColumnOption>,
    pub per_page: PageSize,
    pub per_page_select: Vec<PerPageEntry>,
    pub paging: bool,
    pub pager_delta: usize,
    pub truncate_pager: bool,
    pub first_last: bool,
    pub next_prev: bool,
    pub sortable: bool,
    pub searchable: bool,
    pub collation: CollationOptions,
    pub data_convert: bool,
    pub labels: Labels,
    pub search_query_separator: Option<String>,
    pub row_render: Option<Arc<dyn RowRender>>,
    pub table_render: Option<Arc<dyn TableRender>>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            per_page: PageSize::default(),
            per_page_select: DEFAULT_PER_PAGE_SELECT
                .iter()
                .filter_map(|&count| {
                    PageSize::rows(count).map(|size| PerPageEntry {
                        label: count.to_string(),
                        size,
                    })
                })
                .collect(),
            paging: true,
            pager_delta: DEFAULT_PAGER_DELTA,
            truncate_pager: true,
            first_last: false,
            next_prev: true,
            sortable: true,
            searchable: true,
            collation: CollationOptions::default(),
            data_convert: true,
            labels: Labels::default(),
            search_query_separator: None,
            row_render: None,
            table_render: None,
        }
    }
}

impl TableConfig {
    /// Merges `options` against the defaults. The options are not modified.
    pub fn resolve(options: &TableOptions) -> Result<Self> {
        let defaults = Self::default();
        let per_page = match options.per_page {
            None => defaults.per_page,
            Some(PageSizeOption::Keyword(PageSizeKeyword::All)) => PageSize::All,
            Some(PageSizeOption::Count(count)) => usize::try_from(count)
                .ok()
                .and_then(PageSize::rows)
                .ok_or_else(|| {
                    TableError::InvalidOption(format!(
                        "perPage must be a positive row count or \"all\", got {count}"
                    ))
                })?,
        };
        let per_page_select = match &options.per_page_select {
            None => defaults.per_page_select,
            Some(entries) => entries
                .iter()
                .map(|entry| match entry {
                    PerPageOption::Count(count) => PerPageEntry {
                        label: count.to_string(),
                        size: PageSize::from_count(*count),
                    },
                    PerPageOption::Labeled(label, count) => PerPageEntry {
                        label: label.clone(),
                        size: PageSize::from_count(*count),
                    },
                })
                .collect(),
        };
        let base = defaults.collation;
        let collation = CollationOptions {
            locale: options.locale.clone().unwrap_or(base.locale),
            numeric: options.numeric.unwrap_or(base.numeric),
            case_first: options.case_first.unwrap_or(base.case_first),
            sensitivity: options.sensitivity.unwrap_or(base.sensitivity),
            ignore_punctuation: options.ignore_punctuation.unwrap_or(base.ignore_punctuation),
        };
        let labels = Labels {
            placeholder: options
                .labels
                .placeholder
                .clone()
                .unwrap_or(defaults.labels.placeholder),
            per_page: options
                .labels
                .per_page
                .clone()
                .unwrap_or(defaults.labels.per_page),
            no_rows: options
                .labels
                .no_rows
                .clone()
                .unwrap_or(defaults.labels.no_rows),
            no_results: options
                .labels
                .no_results
                .clone()
                .unwrap_or(defaults.labels.no_results),
            info: options.labels.info.clone().unwrap_or(defaults.labels.info),
        };
        let separator = options
            .search_query_separator
            .clone()
            .filter(|separator| !separator.is_empty());

        Ok(Self {
            columns: options.columns.clone(),
            per_page,
            per_page_select,
            paging: options.paging.unwrap_or(defaults.paging),
            pager_delta: options.pager_delta.unwrap_or(defaults.pager_delta),
            truncate_pager: options.truncate_pager.unwrap_or(defaults.truncate_pager),
            first_last: options.first_last.unwrap_or(defaults.first_last),
            next_prev: options.next_prev.unwrap_or(defaults.next_prev),
            sortable: options.sortable.unwrap_or(defaults.sortable),
            searchable: options.searchable.unwrap_or(defaults.searchable),
            collation,
            data_convert: options.data_convert.unwrap_or(defaults.data_convert),
            labels,
            search_query_separator: separator,
            row_render: options.row_render.clone(),
            table_render: options.table_render.clone(),
        })
    }

    /// All options selecting `index`, merged in declaration order.
    pub fn column_option(&self, index: usize) -> ColumnOption {
        self.columns
            .iter()
            .filter(|option| option.select.contains(index))
            .fold(ColumnOption::new(index), |merged, option| {
                merged.merged_with(option)
            })
    }

    /// Page size in effect: everything when paging is off.
    pub fn effective_page_size(&self) -> PageSize {
        if self.paging { self.per_page } else { PageSize::All }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TableConfig::resolve(&TableOptions::default()).unwrap();
        assert_eq!(config.per_page, PageSize::rows(10).unwrap());
        assert_eq!(config.per_page_select.len(), 5);
        assert_eq!(config.pager_delta, 2);
        assert!(config.truncate_pager);
        assert!(config.collation.numeric);
        assert!(config.collation.ignore_punctuation);
        assert_eq!(config.collation.sensitivity, Sensitivity::Base);
        assert!(config.data_convert);
    }

    #[test]
    fn rejects_zero_per_page() {
        let err = TableConfig::resolve(&TableOptions::default().with_per_page(0)).unwrap_err();
        assert!(matches!(err, TableError::InvalidOption(_)));
    }

    #[test]
    fn non_positive_select_entry_means_all() {
        let options = TableOptions {
            per_page_select: Some(vec![PerPageOption::Labeled("All".to_string(), -1)]),
            ..TableOptions::default()
        };
        let config = TableConfig::resolve(&options).unwrap();
        assert_eq!(config.per_page_select[0].size, PageSize::All);
    }

    #[test]
    fn column_options_merge_across_selects() {
        let options = TableOptions::default()
            .with_column(ColumnOption::new(vec![0, 1]).with_type(ColumnType::Number))
            .with_column(ColumnOption::new(1).with_sortable(false));
        let config = TableConfig::resolve(&options).unwrap();
        let merged = config.column_option(1);
        assert_eq!(merged.kind, Some(ColumnType::Number));
        assert_eq!(merged.sortable, Some(false));
        assert_eq!(config.column_option(0).sortable, None);
    }
}
