//! Stable sorting of row-index sequences.

use tabula_model::{
    ColumnSettings, Result, SortDirection, Table, TableError, UnsortableReason,
};

use crate::compare::{Comparator, SortKey};

/// Row indices of `table` in original insertion order.
pub fn original_order(table: &Table) -> Vec<usize> {
    (0..table.row_count()).collect()
}

/// Checks that `column` exists and may be sorted.
pub fn ensure_sortable(settings: &[ColumnSettings], column: usize) -> Result<&ColumnSettings> {
    let Some(column_settings) = settings.get(column) else {
        return Err(TableError::UnsortableColumn {
            column,
            reason: UnsortableReason::OutOfRange {
                columns: settings.len(),
            },
        });
    };
    if !column_settings.sortable {
        return Err(TableError::UnsortableColumn {
            column,
            reason: UnsortableReason::Disabled,
        });
    }
    Ok(column_settings)
}

/// Returns `rows` ordered by `column`. The sort is stable: rows with equal
/// keys keep their relative order in `rows` for either direction.
pub fn sort_rows(
    table: &Table,
    rows: &[usize],
    settings: &[ColumnSettings],
    column: usize,
    direction: SortDirection,
) -> Result<Vec<usize>> {
    let column_settings = ensure_sortable(settings, column)?;
    let comparator = Comparator::new(column_settings);
    let mut keyed: Vec<(usize, SortKey)> = rows
        .iter()
        .map(|&row| {
            let key = table
                .cell(row, column)
                .map_or_else(SortKey::missing, |cell| comparator.key(cell));
            (row, key)
        })
        .collect();
    keyed.sort_by(|a, b| direction.apply(comparator.compare_keys(&a.1, &b.1)));
    Ok(keyed.into_iter().map(|(row, _)| row).collect())
}
