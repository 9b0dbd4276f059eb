//! Command-line view requests and how they drive a [`DataTable`].

use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing::debug;

use tabula_core::DataTable;
use tabula_model::{ColumnFilter, FilterLiteral, FilterTerm, HeaderCell, PageSize, SortDirection};

/// A column named by 0-based index or by heading title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Index(usize),
    Title(String),
}

impl ColumnRef {
    /// Index of the referenced column. Titles match exactly first, then
    /// ignoring ASCII case.
    pub fn resolve(&self, headings: &[HeaderCell]) -> Result<usize> {
        match self {
            Self::Index(index) if *index < headings.len() => Ok(*index),
            Self::Index(index) => bail!(
                "column {index} is out of range (table has {} columns)",
                headings.len()
            ),
            Self::Title(title) => {
                let titles: Vec<String> = headings
                    .iter()
                    .map(|heading| heading.title_text().trim().to_string())
                    .collect();
                titles
                    .iter()
                    .position(|candidate| candidate == title)
                    .or_else(|| {
                        titles
                            .iter()
                            .position(|candidate| candidate.eq_ignore_ascii_case(title))
                    })
                    .with_context(|| format!("no column titled \"{title}\""))
            }
        }
    }
}

impl FromStr for ColumnRef {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err("column reference is empty".to_string());
        }
        Ok(match value.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Title(value.to_string()),
        })
    }
}

/// `COL` or `COL:asc` / `COL:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    pub column: ColumnRef,
    pub direction: SortDirection,
}

impl FromStr for SortArg {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (column, direction) = match value.rsplit_once(':') {
            Some((column, suffix)) if suffix.eq_ignore_ascii_case("asc") => {
                (column, SortDirection::Asc)
            }
            Some((column, suffix)) if suffix.eq_ignore_ascii_case("desc") => {
                (column, SortDirection::Desc)
            }
            _ => (value, SortDirection::Asc),
        };
        Ok(Self {
            column: column.parse()?,
            direction,
        })
    }
}

/// `COL=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub column: ColumnRef,
    pub value: String,
}

impl FromStr for FilterArg {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let Some((column, literal)) = value.split_once('=') else {
            return Err(format!("expected COL=VALUE, got \"{value}\""));
        };
        Ok(Self {
            column: column.parse()?,
            value: literal.to_string(),
        })
    }
}

/// A positive row count or `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerPageArg {
    Rows(usize),
    All,
}

impl PerPageArg {
    pub fn page_size(self) -> PageSize {
        match self {
            Self::Rows(count) => PageSize::rows(count).unwrap_or(PageSize::All),
            Self::All => PageSize::All,
        }
    }
}

impl FromStr for PerPageArg {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match value.parse::<usize>() {
            Ok(0) | Err(_) => Err(format!(
                "expected a positive row count or \"all\", got \"{value}\""
            )),
            Ok(count) => Ok(Self::Rows(count)),
        }
    }
}

/// Everything `tabula view` can ask of a table.
#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
    pub sort: Option<SortArg>,
    pub search: Option<String>,
    pub search_columns: Vec<ColumnRef>,
    pub filters: Vec<FilterArg>,
    pub page: Option<usize>,
    pub per_page: Option<PerPageArg>,
}

impl ViewQuery {
    /// Applies the request in pipeline order: page size, sort, filters,
    /// search, then the page.
    pub fn apply(&self, table: &mut DataTable) -> Result<()> {
        let headings = table.table().headings().to_vec();
        if let Some(per_page) = self.per_page {
            table.set_page_size(per_page.page_size());
        }
        if let Some(sort) = &self.sort {
            let column = sort.column.resolve(&headings)?;
            table
                .sort(column, sort.direction)
                .with_context(|| format!("sort by column {column}"))?;
        }
        if !self.filters.is_empty() {
            let filters = self.column_filters(&headings)?;
            debug!(filters = filters.len(), "applying column filters");
            table.set_filters(filters).context("apply filters")?;
        }
        if let Some(term) = &self.search {
            if self.search_columns.is_empty() {
                table.search(term).context("search")?;
            } else {
                let columns = self
                    .search_columns
                    .iter()
                    .map(|column| column.resolve(&headings))
                    .collect::<Result<Vec<_>>>()?;
                table.search_columns(term, &columns).context("search")?;
            }
        }
        if let Some(page) = self.page {
            let shown = table.set_page(page);
            if shown != page {
                debug!(requested = page, shown, "page clamped");
            }
        }
        Ok(())
    }

    /// One filter per column, with repeated values of a column OR-ed.
    fn column_filters(&self, headings: &[HeaderCell]) -> Result<Vec<ColumnFilter>> {
        let mut grouped: BTreeMap<usize, Vec<FilterTerm>> = BTreeMap::new();
        for filter in &self.filters {
            let column = filter.column.resolve(headings)?;
            grouped
                .entry(column)
                .or_default()
                .push(FilterTerm::Literal(FilterLiteral::Text(filter.value.clone())));
        }
        Ok(grouped
            .into_iter()
            .map(|(column, terms)| ColumnFilter::new(column, terms))
            .collect())
    }
}
