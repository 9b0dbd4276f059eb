//! Table state: the sort, search, filters, and page over one dataset.
//!
//! Every mutator computes the new row sequences before touching any state,
//! so a rejected call leaves the table exactly as it was.

use std::collections::HashMap;

use tracing::{debug, warn};

use tabula_ingest::{convert_to_markup, normalize_data, normalize_rows, resolve_column};
use tabula_model::{
    Cell, ColumnFilter, ColumnOption, ColumnSelect, ColumnSettings, ColumnType, FilterTerm,
    InputCell, PageSize, Result, SortDirection, SortState, Table, TableConfig, TableError,
    TableInput, TableOptions,
};

use crate::filter::{SearchQuery, apply_filters, check_filter_column, search};
use crate::pager::{PageSlice, PagerItem, PagerOptions, paginate, pager_items};
use crate::sort::{ensure_sortable, original_order, sort_rows};
use crate::view::{InfoParts, TableView, ViewColumn, ViewMessage, ViewRow, format_info};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchState {
    term: String,
    /// Only these columns are searched when set.
    columns: Option<Vec<usize>>,
}

/// Row sequences derived from the table and the current state.
#[derive(Debug, Clone, Default)]
struct Derived {
    /// Every row, in sort order.
    sorted: Vec<usize>,
    /// `sorted` after filters and search.
    matched: Vec<usize>,
}

/// Read-only view of everything the row pipeline depends on.
struct Pipeline<'a> {
    table: &'a Table,
    columns: &'a [ColumnSettings],
    config: &'a TableConfig,
}

impl Pipeline<'_> {
    fn sorted(&self, sort: Option<SortState>) -> Result<Vec<usize>> {
        let original = original_order(self.table);
        match sort {
            Some(state) => sort_rows(
                self.table,
                &original,
                self.columns,
                state.column,
                state.direction,
            ),
            None => Ok(original),
        }
    }

    fn matched(
        &self,
        sorted: &[usize],
        filters: &[ColumnFilter],
        search_state: Option<&SearchState>,
    ) -> Result<Vec<usize>> {
        let filtered = apply_filters(self.table, sorted, filters)?;
        let Some(state) = search_state else {
            return Ok(filtered);
        };
        let query = SearchQuery::new(&state.term, self.config.search_query_separator.as_deref());
        let targets: Vec<&ColumnSettings> = self
            .columns
            .iter()
            .filter(|settings| settings.is_search_target())
            .filter(|settings| {
                state
                    .columns
                    .as_ref()
                    .is_none_or(|columns| columns.contains(&settings.index))
            })
            .collect();
        Ok(search(self.table, &filtered, &query, &targets))
    }

    fn derive(
        &self,
        sort: Option<SortState>,
        filters: &[ColumnFilter],
        search_state: Option<&SearchState>,
    ) -> Result<Derived> {
        let sorted = self.sorted(sort)?;
        let matched = self.matched(&sorted, filters, search_state)?;
        Ok(Derived { sorted, matched })
    }
}

/// A dataset with its resolved configuration and current view state.
#[derive(Debug, Clone)]
pub struct DataTable {
    table: Table,
    config: TableConfig,
    columns: Vec<ColumnSettings>,
    has_headings: bool,
    sort: Option<SortState>,
    search: Option<SearchState>,
    filters: Vec<ColumnFilter>,
    /// Position in each column's configured filter list, for `cycle_filter`.
    filter_steps: HashMap<usize, usize>,
    page_size: PageSize,
    page: usize,
    derived: Derived,
}

impl DataTable {
    /// Normalizes `input`, resolves every column, and applies the initial
    /// sort of the first column carrying a `sort` hint.
    pub fn new(input: impl Into<TableInput>, options: &TableOptions) -> Result<Self> {
        let mut config = TableConfig::resolve(options)?;
        let (mut table, has_headings) = match input.into() {
            TableInput::Raw(data) => {
                let normalized = normalize_data(data)?;
                (normalized.table, normalized.has_headings)
            }
            TableInput::Shaped(data) => (Table::new(data.headings, data.data)?, true),
        };
        if !has_headings {
            config.sortable = false;
        }
        for option in &config.columns {
            for &index in option.select.indices() {
                if index >= table.column_count() {
                    warn!(
                        column = index,
                        columns = table.column_count(),
                        "column option selects a missing column"
                    );
                }
            }
        }

        let mut columns = Vec::with_capacity(table.column_count());
        for index in 0..table.column_count() {
            let option = config.column_option(index);
            let settings = column_settings(&mut table, index, &option, &config, has_headings);
            columns.push(settings);
        }

        let sort = columns.iter().find_map(|settings| {
            let direction = settings.sort?;
            if settings.sortable {
                Some(SortState {
                    column: settings.index,
                    direction,
                })
            } else {
                warn!(column = settings.index, "ignoring sort hint on unsortable column");
                None
            }
        });

        let derived = Pipeline {
            table: &table,
            columns: &columns,
            config: &config,
        }
        .derive(sort, &[], None)?;
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            sorted_by = ?sort.map(|state| state.column),
            "table initialized"
        );

        Ok(Self {
            page_size: config.effective_page_size(),
            table,
            config,
            columns,
            has_headings,
            sort,
            search: None,
            filters: Vec::new(),
            filter_steps: HashMap::new(),
            page: 1,
            derived,
        })
    }

    fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            table: &self.table,
            columns: &self.columns,
            config: &self.config,
        }
    }

    fn commit(&mut self, derived: Derived) {
        debug!(
            rows = self.table.row_count(),
            matched = derived.matched.len(),
            "rows recomputed"
        );
        self.derived = derived;
        self.page = self.page.clamp(1, self.page_count().max(1));
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= self.table.column_count() {
            return Err(TableError::InvalidOption(format!(
                "column {column} does not exist (table has {} columns)",
                self.table.column_count()
            )));
        }
        Ok(())
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn columns(&self) -> &[ColumnSettings] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnSettings> {
        self.columns.get(index)
    }

    pub fn has_headings(&self) -> bool {
        self.has_headings
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_ref().map(|state| state.term.as_str())
    }

    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    /// Every row in the current sort order, before filters and search.
    pub fn sorted_rows(&self) -> &[usize] {
        &self.derived.sorted
    }

    /// Rows surviving filters and search, in sort order, across all pages.
    pub fn visible_rows(&self) -> &[usize] {
        &self.derived.matched
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        crate::pager::page_count(self.derived.matched.len(), self.page_size)
    }

    /// Current page, zero when nothing matches.
    pub fn current_page(&self) -> usize {
        if self.page_count() == 0 {
            0
        } else {
            self.page.clamp(1, self.page_count())
        }
    }

    pub fn page(&self) -> PageSlice {
        paginate(&self.derived.matched, self.page_size, self.page)
    }

    pub fn pager(&self) -> Vec<PagerItem> {
        pager_items(
            self.current_page(),
            self.page_count(),
            PagerOptions::from_config(&self.config),
        )
    }

    /// The configured info label filled in for the current page.
    pub fn info_text(&self) -> String {
        info_for(&self.config, &self.page(), self.derived.matched.len())
    }

    /// The current page with everything a renderer needs.
    pub fn view(&self) -> TableView<'_> {
        let slice = self.page();
        let visible: Vec<&ColumnSettings> =
            self.columns.iter().filter(|settings| !settings.hidden).collect();
        let columns = visible
            .iter()
            .copied()
            .filter_map(|settings| {
                let heading = self.table.headings().get(settings.index)?;
                Some(ViewColumn {
                    index: settings.index,
                    heading,
                    settings,
                    sort: self
                        .sort
                        .filter(|state| state.column == settings.index)
                        .map(|state| state.direction),
                })
            })
            .collect();
        let rows = slice
            .rows
            .iter()
            .filter_map(|&row| {
                let cells = self.table.row(row)?;
                Some(ViewRow {
                    index: row,
                    all_cells: cells,
                    cells: visible
                        .iter()
                        .filter_map(|settings| cells.get(settings.index))
                        .collect(),
                })
            })
            .collect();
        let message = if self.table.is_empty() {
            Some(ViewMessage::NoRows(self.config.labels.no_rows.clone()))
        } else if self.derived.matched.is_empty() {
            Some(ViewMessage::NoResults(self.config.labels.no_results.clone()))
        } else {
            None
        };
        TableView {
            columns,
            rows,
            page_count: slice.page_count,
            current_page: slice.current_page,
            matched_rows: self.derived.matched.len(),
            total_rows: self.table.row_count(),
            pager: self.pager(),
            info: info_for(&self.config, &slice, self.derived.matched.len()),
            message,
            row_render: self.config.row_render.as_ref(),
            table_render: self.config.table_render.as_ref(),
        }
    }

    // =========================================================================
    // SORTING
    // =========================================================================

    /// Sorts by `column`. The current page is kept.
    pub fn sort(&mut self, column: usize, direction: SortDirection) -> Result<()> {
        let state = SortState { column, direction };
        let derived = self
            .pipeline()
            .derive(Some(state), &self.filters, self.search.as_ref())?;
        self.sort = Some(state);
        self.commit(derived);
        Ok(())
    }

    /// Advances `column` through its sort cycle, as a header click does.
    /// The first toggle uses the column's `sort` hint when it has one.
    pub fn toggle_sort(&mut self, column: usize) -> Result<SortDirection> {
        let settings = ensure_sortable(&self.columns, column)?;
        let cycle = &settings.sort_cycle;
        let first = cycle.first().copied().unwrap_or(SortDirection::Asc);
        let next = match self.sort {
            Some(state) if state.column == column => cycle
                .iter()
                .position(|&direction| direction == state.direction)
                .map_or(first, |position| cycle[(position + 1) % cycle.len()]),
            _ => settings.sort.unwrap_or(first),
        };
        self.sort(column, next)?;
        Ok(next)
    }

    /// Returns to the original row order.
    pub fn clear_sort(&mut self) -> Result<()> {
        let derived = self
            .pipeline()
            .derive(None, &self.filters, self.search.as_ref())?;
        self.sort = None;
        self.commit(derived);
        Ok(())
    }

    // =========================================================================
    // SEARCH AND FILTERS
    // =========================================================================

    fn apply_search(&mut self, state: Option<SearchState>) -> Result<()> {
        let matched =
            self.pipeline()
                .matched(&self.derived.sorted, &self.filters, state.as_ref())?;
        let sorted = std::mem::take(&mut self.derived.sorted);
        self.search = state;
        self.page = 1;
        self.commit(Derived { sorted, matched });
        Ok(())
    }

    /// Searches every searchable, visible column. A blank term clears the
    /// search. Returns to the first page.
    pub fn search(&mut self, term: &str) -> Result<()> {
        if term.trim().is_empty() {
            return self.clear_search();
        }
        self.apply_search(Some(SearchState {
            term: term.to_string(),
            columns: None,
        }))
    }

    /// Like [`search`](Self::search), restricted to `columns`.
    pub fn search_columns(&mut self, term: &str, columns: &[usize]) -> Result<()> {
        for &column in columns {
            check_filter_column(&self.table, column)?;
        }
        if term.trim().is_empty() {
            return self.clear_search();
        }
        self.apply_search(Some(SearchState {
            term: term.to_string(),
            columns: Some(columns.to_vec()),
        }))
    }

    pub fn clear_search(&mut self) -> Result<()> {
        self.apply_search(None)
    }

    fn apply_filter_list(&mut self, filters: Vec<ColumnFilter>) -> Result<()> {
        let matched =
            self.pipeline()
                .matched(&self.derived.sorted, &filters, self.search.as_ref())?;
        let sorted = std::mem::take(&mut self.derived.sorted);
        self.filters = filters;
        self.page = 1;
        self.commit(Derived { sorted, matched });
        Ok(())
    }

    /// Adds a filter, AND-ed with the active ones.
    pub fn add_filter(&mut self, filter: ColumnFilter) -> Result<()> {
        let column = filter.column;
        let mut filters = self.filters.clone();
        filters.push(filter);
        self.apply_filter_list(filters)?;
        self.filter_steps.remove(&column);
        Ok(())
    }

    /// Replaces every active filter.
    pub fn set_filters(&mut self, filters: Vec<ColumnFilter>) -> Result<()> {
        self.apply_filter_list(filters)?;
        self.filter_steps.clear();
        Ok(())
    }

    pub fn clear_filters(&mut self) -> Result<()> {
        self.set_filters(Vec::new())
    }

    /// Activates the next entry of the column's configured filter list,
    /// replacing any other filter on that column. Stepping past the last
    /// entry removes the column's filter and returns `None`.
    pub fn cycle_filter(&mut self, column: usize) -> Result<Option<FilterTerm>> {
        check_filter_column(&self.table, column)?;
        let terms = &self.columns[column].filter;
        if terms.is_empty() {
            return Err(TableError::invalid_filter(
                column,
                "column has no filter values to cycle",
            ));
        }
        let step = self.filter_steps.get(&column).map_or(0, |step| step + 1);
        let active = terms.get(step).cloned();
        let mut filters: Vec<ColumnFilter> = self
            .filters
            .iter()
            .filter(|filter| filter.column != column)
            .cloned()
            .collect();
        if let Some(term) = &active {
            filters.push(ColumnFilter::new(column, vec![term.clone()]));
        }
        self.apply_filter_list(filters)?;
        match active {
            Some(_) => self.filter_steps.insert(column, step),
            None => self.filter_steps.remove(&column),
        };
        Ok(active)
    }

    // =========================================================================
    // PAGING
    // =========================================================================

    /// Moves to `page`, clamped into the valid range. Returns the page now
    /// current.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.page_count().max(1));
        self.current_page()
    }

    pub fn next_page(&mut self) -> bool {
        let before = self.current_page();
        self.set_page(before + 1) != before
    }

    pub fn prev_page(&mut self) -> bool {
        let before = self.current_page();
        self.set_page(before.saturating_sub(1)) != before
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    // =========================================================================
    // COLUMNS
    // =========================================================================

    fn set_hidden(&mut self, columns: &[usize], hidden: bool) -> Result<()> {
        for &column in columns {
            self.check_column(column)?;
        }
        let mut settings = self.columns.clone();
        for &column in columns {
            settings[column].hidden = hidden;
        }
        let matched = Pipeline {
            table: &self.table,
            columns: &settings,
            config: &self.config,
        }
        .matched(&self.derived.sorted, &self.filters, self.search.as_ref())?;
        let sorted = std::mem::take(&mut self.derived.sorted);
        self.columns = settings;
        self.commit(Derived { sorted, matched });
        Ok(())
    }

    /// Hides columns from the view and from search.
    pub fn hide_columns(&mut self, columns: &[usize]) -> Result<()> {
        self.set_hidden(columns, true)
    }

    pub fn show_columns(&mut self, columns: &[usize]) -> Result<()> {
        self.set_hidden(columns, false)
    }

    /// Layers `option` over the column's configuration and resolves it
    /// again. A sort on the column is dropped if it is no longer sortable.
    pub fn reconfigure_column(&mut self, column: usize, option: &ColumnOption) -> Result<()> {
        self.check_column(column)?;
        let mut config = self.config.clone();
        let select = ColumnSelect::One(column);
        // One override entry per column, kept last so it wins over shared selects.
        let existing = config.columns.iter().position(|entry| entry.select == select);
        let stored = match existing {
            Some(position) => config.columns.remove(position).merged_with(option),
            None => ColumnOption {
                select,
                ..option.clone()
            },
        };
        config.columns.push(stored);

        let merged = config.column_option(column);
        let mut table = self.table.clone();
        let settings = column_settings(&mut table, column, &merged, &config, self.has_headings);
        let mut columns = self.columns.clone();
        columns[column] = settings;

        let sort = self.sort.filter(|state| columns[state.column].sortable);
        let derived = Pipeline {
            table: &table,
            columns: &columns,
            config: &config,
        }
        .derive(sort, &self.filters, self.search.as_ref())?;

        self.table = table;
        self.config = config;
        self.columns = columns;
        self.sort = sort;
        self.commit(derived);
        Ok(())
    }

    // =========================================================================
    // INSERTION
    // =========================================================================

    /// Normalizes and appends rows. Columns whose type was inferred are
    /// resolved again over the grown column.
    pub fn insert_rows(&mut self, rows: Vec<Vec<InputCell>>) -> Result<()> {
        let cells = normalize_rows(rows, self.table.column_count(), self.table.row_count())?;
        self.insert_cells(cells)
    }

    /// Appends already normalized rows.
    pub fn insert_cells(&mut self, rows: Vec<Vec<Cell>>) -> Result<()> {
        let added = rows.len();
        let mut table = self.table.clone();
        table.append_rows(rows)?;

        let mut columns = Vec::with_capacity(self.columns.len());
        for current in &self.columns {
            if current.inferred {
                let option = self.config.column_option(current.index);
                let mut settings = column_settings(
                    &mut table,
                    current.index,
                    &option,
                    &self.config,
                    self.has_headings,
                );
                // Visibility is view state, not configuration.
                settings.hidden = current.hidden;
                columns.push(settings);
            } else {
                if current.kind == ColumnType::Html {
                    convert_column(&mut table, current.index);
                }
                columns.push(current.clone());
            }
        }

        let derived = Pipeline {
            table: &table,
            columns: &columns,
            config: &self.config,
        }
        .derive(self.sort, &self.filters, self.search.as_ref())?;
        debug!(added, rows = table.row_count(), "rows inserted");

        self.table = table;
        self.columns = columns;
        self.commit(derived);
        Ok(())
    }
}

/// Resolves one column; `html` columns get their text cells parsed.
fn column_settings(
    table: &mut Table,
    index: usize,
    option: &ColumnOption,
    config: &TableConfig,
    has_headings: bool,
) -> ColumnSettings {
    let mut settings = resolve_column(index, table.column(index), option, config);
    if !has_headings {
        settings.sortable = false;
    }
    if settings.kind == ColumnType::Html {
        convert_column(table, index);
    }
    settings
}

/// Parses the text cells of a column into markup. Cells that already hold
/// markup are left alone.
fn convert_column(table: &mut Table, index: usize) {
    for cell in table.column_cells_mut(index) {
        convert_to_markup(cell);
    }
}

fn info_for(config: &TableConfig, slice: &PageSlice, matched: usize) -> String {
    let parts = InfoParts {
        start: if slice.is_empty() { 0 } else { slice.start + 1 },
        end: slice.start + slice.rows.len(),
        rows: matched,
        page: slice.current_page,
        pages: slice.page_count,
    };
    format_info(&config.labels.info, parts)
}
