//! User-facing configuration, as supplied by the caller.
//!
//! Every field is optional. [`TableConfig::resolve`](crate::TableConfig::resolve)
//! merges these against the built-in defaults; the rest of the engine only
//! ever reads the resolved form.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::filter::FilterTerm;
use crate::render::{CellRender, RowRender, TableRender};

/// Effective data kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
    Html,
    Other,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Html => "html",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "boolean" => Ok(Self::Boolean),
            "html" => Ok(Self::Html),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown column type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Which differences between strings are significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Only base letters differ: `a = á = A`.
    #[default]
    Base,
    /// Base letters and accents differ: `a ≠ á`, `a = A`.
    Accent,
    /// Base letters and case differ: `a ≠ A`, `a = á`.
    Case,
    /// Everything differs.
    Variant,
}

impl Sensitivity {
    pub fn distinguishes_accents(self) -> bool {
        matches!(self, Self::Accent | Self::Variant)
    }

    pub fn distinguishes_case(self) -> bool {
        matches!(self, Self::Case | Self::Variant)
    }
}

/// Whether upper or lower case sorts first among otherwise equal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFirst {
    Upper,
    Lower,
    /// Locale default (lower case first).
    #[default]
    #[serde(rename = "false")]
    Off,
}

/// One column index or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelect {
    One(usize),
    Many(Vec<usize>),
}

impl ColumnSelect {
    pub fn indices(&self) -> &[usize] {
        match self {
            Self::One(index) => std::slice::from_ref(index),
            Self::Many(indices) => indices,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

impl Default for ColumnSelect {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<usize> for ColumnSelect {
    fn from(value: usize) -> Self {
        Self::One(value)
    }
}

impl From<Vec<usize>> for ColumnSelect {
    fn from(value: Vec<usize>) -> Self {
        Self::Many(value)
    }
}

/// Options for the column(s) named by `select`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnOption {
    pub select: ColumnSelect,
    #[serde(rename = "type")]
    pub kind: Option<ColumnType>,
    /// Date format for `date` columns.
    pub format: Option<String>,
    pub sortable: Option<bool>,
    pub searchable: Option<bool>,
    /// Hidden columns are not displayed and are excluded from search.
    pub hidden: Option<bool>,
    /// Sort the table by this column on initialization.
    pub sort: Option<SortDirection>,
    /// Explicit category order overriding type-based comparison.
    pub sort_sequence: Option<Vec<String>>,
    /// Directions visited by repeated header toggles.
    pub sort_cycle: Option<Vec<SortDirection>>,
    pub locale: Option<String>,
    pub numeric: Option<bool>,
    pub case_first: Option<CaseFirst>,
    pub sensitivity: Option<Sensitivity>,
    pub ignore_punctuation: Option<bool>,
    /// Filter states cycled through instead of sorting.
    pub filter: Option<Vec<FilterTerm>>,
    #[serde(skip)]
    pub render: Option<Arc<dyn CellRender>>,
}

impl ColumnOption {
    pub fn new(select: impl Into<ColumnSelect>) -> Self {
        Self {
            select: select.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, kind: ColumnType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = Some(searchable);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn with_sort(mut self, direction: SortDirection) -> Self {
        self.sort = Some(direction);
        self
    }

    pub fn with_sort_sequence<I, S>(mut self, sequence: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_sequence = Some(sequence.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sort_cycle(mut self, cycle: Vec<SortDirection>) -> Self {
        self.sort_cycle = Some(cycle);
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    pub fn with_ignore_punctuation(mut self, ignore: bool) -> Self {
        self.ignore_punctuation = Some(ignore);
        self
    }

    pub fn with_filter(mut self, terms: Vec<FilterTerm>) -> Self {
        self.filter = Some(terms);
        self
    }

    pub fn with_render(mut self, render: impl CellRender + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Layers `other` on top of `self`: fields set in `other` win.
    #[must_use]
    pub fn merged_with(&self, other: &ColumnOption) -> ColumnOption {
        ColumnOption {
            select: self.select.clone(),
            kind: other.kind.or(self.kind),
            format: other.format.clone().or_else(|| self.format.clone()),
            sortable: other.sortable.or(self.sortable),
            searchable: other.searchable.or(self.searchable),
            hidden: other.hidden.or(self.hidden),
            sort: other.sort.or(self.sort),
            sort_sequence: other
                .sort_sequence
                .clone()
                .or_else(|| self.sort_sequence.clone()),
            sort_cycle: other.sort_cycle.clone().or_else(|| self.sort_cycle.clone()),
            locale: other.locale.clone().or_else(|| self.locale.clone()),
            numeric: other.numeric.or(self.numeric),
            case_first: other.case_first.or(self.case_first),
            sensitivity: other.sensitivity.or(self.sensitivity),
            ignore_punctuation: other.ignore_punctuation.or(self.ignore_punctuation),
            filter: other.filter.clone().or_else(|| self.filter.clone()),
            render: other.render.clone().or_else(|| self.render.clone()),
        }
    }
}

/// `perPage` accepts a row count or the keyword `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PageSizeOption {
    Count(i64),
    Keyword(PageSizeKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSizeKeyword {
    All,
}

/// One `perPageSelect` entry: a count, or a `[label, count]` pair. A
/// non-positive count stands for "all rows".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PerPageOption {
    Count(i64),
    Labeled(String, i64),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelOptions {
    pub placeholder: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    #[serde(rename = "noRows")]
    pub no_rows: Option<String>,
    #[serde(rename = "noResults")]
    pub no_results: Option<String>,
    pub info: Option<String>,
}

/// Table-wide options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    pub columns: Vec<ColumnOption>,
    pub per_page: Option<PageSizeOption>,
    pub per_page_select: Option<Vec<PerPageOption>>,
    pub paging: Option<bool>,
    pub pager_delta: Option<usize>,
    pub truncate_pager: Option<bool>,
    pub first_last: Option<bool>,
    pub next_prev: Option<bool>,
    pub sortable: Option<bool>,
    pub searchable: Option<bool>,
    pub sensitivity: Option<Sensitivity>,
    pub ignore_punctuation: Option<bool>,
    pub locale: Option<String>,
    pub numeric: Option<bool>,
    pub case_first: Option<CaseFirst>,
    pub data_convert: Option<bool>,
    pub labels: LabelOptions,
    pub search_query_separator: Option<String>,
    #[serde(skip)]
    pub row_render: Option<Arc<dyn RowRender>>,
    #[serde(skip)]
    pub table_render: Option<Arc<dyn TableRender>>,
}

impl TableOptions {
    pub fn with_column(mut self, column: ColumnOption) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(PageSizeOption::Count(per_page));
        self
    }

    pub fn with_row_render(mut self, render: impl RowRender + 'static) -> Self {
        self.row_render = Some(Arc::new(render));
        self
    }

    pub fn with_table_render(mut self, render: impl TableRender + 'static) -> Self {
        self.table_render = Some(Arc::new(render));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_options() {
        let options: TableOptions = serde_json::from_str(
            r#"{
                "perPage": "all",
                "perPageSelect": [5, ["All", -1]],
                "caseFirst": "false",
                "sensitivity": "accent",
                "columns": [
                    {"select": 1, "type": "number", "sort": "desc"},
                    {"select": [2, 3], "hidden": true, "filter": ["x", 2]}
                ]
            }"#,
        )
        .expect("parse options");
        assert_eq!(
            options.per_page,
            Some(PageSizeOption::Keyword(PageSizeKeyword::All))
        );
        assert_eq!(
            options.per_page_select,
            Some(vec![
                PerPageOption::Count(5),
                PerPageOption::Labeled("All".to_string(), -1)
            ])
        );
        assert_eq!(options.case_first, Some(CaseFirst::Off));
        assert_eq!(options.sensitivity, Some(Sensitivity::Accent));
        assert_eq!(options.columns[0].kind, Some(ColumnType::Number));
        assert_eq!(options.columns[0].sort, Some(SortDirection::Desc));
        assert!(options.columns[1].select.contains(3));
        assert_eq!(options.columns[1].filter.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn merge_prefers_later_fields() {
        let base = ColumnOption::new(0)
            .with_type(ColumnType::Number)
            .with_sortable(false);
        let over = ColumnOption::new(0).with_sortable(true);
        let merged = base.merged_with(&over);
        assert_eq!(merged.kind, Some(ColumnType::Number));
        assert_eq!(merged.sortable, Some(true));
    }
}
