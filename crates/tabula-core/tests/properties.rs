use std::cmp::Ordering;

use proptest::prelude::*;

use tabula_core::{Comparator, original_order, sort_rows};
use tabula_model::{Cell, ColumnSettings, ColumnType, HeaderCell, SortDirection, Table, TableConfig};

fn table(cells: Vec<Cell>) -> Table {
    Table::new(
        vec![HeaderCell::new("value")],
        cells.into_iter().map(|cell| vec![cell]).collect(),
    )
    .unwrap()
}

fn settings(kind: ColumnType) -> Vec<ColumnSettings> {
    let mut settings = ColumnSettings::new(0, &TableConfig::default());
    settings.kind = kind;
    vec![settings]
}

fn text_cells() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec("[a-cA-C0-9 .-]{0,4}", 0..40)
        .prop_map(|values| values.into_iter().map(Cell::new).collect())
}

proptest! {
    #[test]
    fn sorting_is_idempotent(cells in text_cells(), desc in any::<bool>()) {
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        let table = table(cells);
        let settings = settings(ColumnType::String);
        let once = sort_rows(&table, &original_order(&table), &settings, 0, direction).unwrap();
        let twice = sort_rows(&table, &once, &settings, 0, direction).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn equal_keys_keep_original_order(cells in text_cells(), desc in any::<bool>()) {
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        let table = table(cells);
        let settings = settings(ColumnType::String);
        let comparator = Comparator::new(&settings[0]);
        let sorted = sort_rows(&table, &original_order(&table), &settings, 0, direction).unwrap();
        for pair in sorted.windows(2) {
            let a = &table.rows()[pair[0]][0];
            let b = &table.rows()[pair[1]][0];
            let ordering = direction.apply(comparator.compare(a, b));
            prop_assert_ne!(ordering, Ordering::Greater);
            if ordering == Ordering::Equal {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn descending_reverses_distinct_keys(
        values in prop::collection::hash_set(-10_000i64..10_000, 0..40)
    ) {
        let table = table(values.into_iter().map(Cell::new).collect());
        let settings = settings(ColumnType::Number);
        let rows = original_order(&table);
        let mut asc = sort_rows(&table, &rows, &settings, 0, SortDirection::Asc).unwrap();
        let desc = sort_rows(&table, &rows, &settings, 0, SortDirection::Desc).unwrap();
        asc.reverse();
        prop_assert_eq!(asc, desc);
    }
}
