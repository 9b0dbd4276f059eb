use tabula_core::{DataTable, PagerItem, ViewMessage};
use tabula_model::{
    ColumnFilter, ColumnOption, ColumnSelect, ColumnType, DataOption, FilterLiteral, FilterTerm, InputCell,
    Predicate, RawValue, SortDirection, SortState, TableError, TableOptions, UnsortableReason,
};

fn data(headings: &[&str], rows: &[&[&str]]) -> DataOption {
    DataOption {
        headings: Some(headings.iter().map(|h| h.to_string()).collect()),
        data: Some(
            rows.iter()
                .map(|row| row.iter().map(|value| InputCell::from(*value)).collect())
                .collect(),
        ),
    }
}

fn single_column(values: &[&str]) -> DataOption {
    let rows: Vec<Vec<&str>> = values.iter().map(|value| vec![*value]).collect();
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    data(&["Value"], &rows)
}

#[test]
fn decorated_numbers_sort_by_magnitude() {
    let mut table =
        DataTable::new(single_column(&["$1,234.50", "1234.5", "123%"]), &TableOptions::default())
            .unwrap();
    assert_eq!(table.columns()[0].kind, ColumnType::Number);
    table.sort(0, SortDirection::Asc).unwrap();
    assert_eq!(table.visible_rows(), &[2, 0, 1]);
    table.sort(0, SortDirection::Desc).unwrap();
    assert_eq!(table.visible_rows(), &[0, 1, 2]);
}

#[test]
fn pages_of_ten_over_twenty_three_rows() {
    let values: Vec<String> = (0..23).map(|i| format!("row {i}")).collect();
    let values: Vec<&str> = values.iter().map(String::as_str).collect();
    let mut table = DataTable::new(single_column(&values), &TableOptions::default()).unwrap();
    assert_eq!(table.page_count(), 3);
    assert_eq!(table.set_page(5), 3);
    let page = table.page();
    assert_eq!(page.rows, vec![20, 21, 22]);
    assert_eq!(table.info_text(), "Showing 21 to 23 of 23 entries");
    assert!(!table.next_page());
    assert!(table.prev_page());
    assert_eq!(table.current_page(), 2);
}

#[test]
fn filter_and_search_intersect_in_row_order() {
    let rows: Vec<[String; 2]> = (0..12)
        .map(|i| {
            let tag = if [2, 5, 9].contains(&i) { "x" } else { "y" };
            let text = if [5, 9, 11].contains(&i) { "needle" } else { "hay" };
            [tag.to_string(), format!("{text} {i}")]
        })
        .collect();
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    let mut table = DataTable::new(data(&["Tag", "Text"], &rows), &TableOptions::default()).unwrap();

    table.add_filter(ColumnFilter::value(0, "x")).unwrap();
    assert_eq!(table.visible_rows(), &[2, 5, 9]);
    table.search("needle").unwrap();
    assert_eq!(table.visible_rows(), &[5, 9]);
    table.clear_filters().unwrap();
    assert_eq!(table.visible_rows(), &[5, 9, 11]);
    table.search("").unwrap();
    assert_eq!(table.visible_rows().len(), 12);
}

#[test]
fn short_row_leaves_table_unchanged() {
    let mut table = DataTable::new(
        data(&["A", "B"], &[&["1", "x"], &["2", "y"]]),
        &TableOptions::default(),
    )
    .unwrap();
    table.sort(0, SortDirection::Desc).unwrap();
    let before = table.visible_rows().to_vec();

    let err = table
        .insert_rows(vec![
            vec![InputCell::from("3"), InputCell::from("z")],
            vec![InputCell::from("4")],
        ])
        .unwrap_err();
    assert_eq!(
        err,
        TableError::ColumnCountMismatch {
            row: 3,
            expected: 2,
            found: 1
        }
    );
    assert_eq!(table.table().row_count(), 2);
    assert_eq!(table.visible_rows(), before.as_slice());
}

#[test]
fn inserted_rows_are_sorted_and_retyped() {
    let mut table = DataTable::new(single_column(&["3", "1"]), &TableOptions::default()).unwrap();
    assert_eq!(table.columns()[0].kind, ColumnType::Number);
    table.sort(0, SortDirection::Asc).unwrap();
    table.insert_rows(vec![vec![InputCell::from("2")]]).unwrap();
    assert_eq!(table.visible_rows(), &[1, 2, 0]);

    table.insert_rows(vec![vec![InputCell::from("many")]]).unwrap();
    assert_eq!(table.columns()[0].kind, ColumnType::String);
}

#[test]
fn rejected_calls_keep_previous_state() {
    let options = TableOptions::default().with_column(ColumnOption::new(1).with_sortable(false));
    let mut table = DataTable::new(
        data(&["A", "B"], &[&["b", "1"], &["a", "2"]]),
        &options,
    )
    .unwrap();
    table.sort(0, SortDirection::Asc).unwrap();

    let err = table.sort(1, SortDirection::Asc).unwrap_err();
    assert_eq!(
        err,
        TableError::UnsortableColumn {
            column: 1,
            reason: UnsortableReason::Disabled
        }
    );
    assert!(matches!(
        table.sort(9, SortDirection::Asc),
        Err(TableError::UnsortableColumn {
            reason: UnsortableReason::OutOfRange { columns: 2 },
            ..
        })
    ));
    let failing = ColumnFilter::new(
        0,
        vec![Predicate::fallible(|_: &RawValue| Err("broken".to_string())).into()],
    );
    assert!(matches!(
        table.add_filter(failing),
        Err(TableError::InvalidFilter { column: 0, .. })
    ));
    assert!(table.filters().is_empty());
    assert_eq!(
        table.sort_state(),
        Some(SortState {
            column: 0,
            direction: SortDirection::Asc
        })
    );
    assert_eq!(table.visible_rows(), &[1, 0]);
}

#[test]
fn sort_hint_and_header_cycle() {
    let options = TableOptions::default().with_column(
        ColumnOption::new(0)
            .with_sort(SortDirection::Desc)
            .with_sort_cycle(vec![SortDirection::Desc, SortDirection::Asc]),
    );
    let mut table = DataTable::new(single_column(&["b", "c", "a"]), &options).unwrap();
    assert_eq!(table.visible_rows(), &[1, 0, 2]);

    assert_eq!(table.toggle_sort(0).unwrap(), SortDirection::Asc);
    assert_eq!(table.visible_rows(), &[2, 0, 1]);
    assert_eq!(table.toggle_sort(0).unwrap(), SortDirection::Desc);
    table.clear_sort().unwrap();
    assert_eq!(table.visible_rows(), &[0, 1, 2]);
}

#[test]
fn sort_sequence_orders_categories() {
    let options = TableOptions::default()
        .with_column(ColumnOption::new(0).with_sort_sequence(["High", "Medium", "Low"]));
    let mut table =
        DataTable::new(single_column(&["Low", "Other", "High", "Medium"]), &options).unwrap();
    table.sort(0, SortDirection::Asc).unwrap();
    assert_eq!(table.visible_rows(), &[2, 3, 0, 1]);
}

#[test]
fn headless_tables_cannot_sort() {
    let input = DataOption {
        headings: None,
        data: Some(vec![vec![InputCell::from("b")], vec![InputCell::from("a")]]),
    };
    let mut table = DataTable::new(input, &TableOptions::default()).unwrap();
    assert!(!table.has_headings());
    assert!(matches!(
        table.sort(0, SortDirection::Asc),
        Err(TableError::UnsortableColumn {
            reason: UnsortableReason::Disabled,
            ..
        })
    ));
}

#[test]
fn hidden_columns_are_not_searched() {
    let mut table = DataTable::new(
        data(&["Name", "Secret"], &[&["Ada", "token"], &["Bob", "other"]]),
        &TableOptions::default(),
    )
    .unwrap();
    table.search("token").unwrap();
    assert_eq!(table.visible_rows(), &[0]);
    table.hide_columns(&[1]).unwrap();
    assert!(table.visible_rows().is_empty());
    assert_eq!(table.view().columns.len(), 1);
    table.show_columns(&[1]).unwrap();
    assert_eq!(table.visible_rows(), &[0]);
    assert!(matches!(
        table.hide_columns(&[4]),
        Err(TableError::InvalidOption(_))
    ));
}

#[test]
fn restricted_search_and_word_separator() {
    let options = TableOptions {
        search_query_separator: Some(" ".to_string()),
        ..TableOptions::default()
    };
    let mut table = DataTable::new(
        data(
            &["Name", "City"],
            &[&["Ada", "Paris"], &["Paris Hilton", "Rome"], &["Ada", "Rome"]],
        ),
        &options,
    )
    .unwrap();
    table.search("ada rome").unwrap();
    assert_eq!(table.visible_rows(), &[2]);
    table.search_columns("paris", &[0]).unwrap();
    assert_eq!(table.visible_rows(), &[1]);
    assert!(matches!(
        table.search_columns("paris", &[5]),
        Err(TableError::InvalidFilter { column: 5, .. })
    ));
}

#[test]
fn filter_cycle_steps_through_configured_values() {
    let terms = vec![
        FilterTerm::Literal(FilterLiteral::from("Yes")),
        FilterTerm::Literal(FilterLiteral::from("No")),
    ];
    let options =
        TableOptions::default().with_column(ColumnOption::new(0).with_filter(terms));
    let mut table = DataTable::new(single_column(&["Yes", "No", "Yes"]), &options).unwrap();

    assert!(table.cycle_filter(0).unwrap().is_some());
    assert_eq!(table.visible_rows(), &[0, 2]);
    assert!(table.cycle_filter(0).unwrap().is_some());
    assert_eq!(table.visible_rows(), &[1]);
    assert!(table.cycle_filter(0).unwrap().is_none());
    assert_eq!(table.visible_rows(), &[0, 1, 2]);
}

#[test]
fn html_columns_search_text_not_tags() {
    let options = TableOptions::default()
        .with_column(ColumnOption::new(0).with_type(ColumnType::Html));
    let mut table = DataTable::new(
        single_column(&["<b>bold move</b>", "<i>quiet</i>"]),
        &options,
    )
    .unwrap();
    assert!(table.table().rows()[0][0].value.is_markup());
    table.search("b").unwrap();
    assert_eq!(table.visible_rows(), &[0]);
    table.search("quiet").unwrap();
    assert_eq!(table.visible_rows(), &[1]);
}

#[test]
fn empty_states_carry_messages() {
    let empty = DataTable::new(data(&["A"], &[]), &TableOptions::default()).unwrap();
    let view = empty.view();
    assert_eq!(view.page_count, 0);
    assert_eq!(view.current_page, 0);
    assert!(matches!(view.message, Some(ViewMessage::NoRows(_))));
    assert_eq!(view.info, "Showing 0 to 0 of 0 entries");

    let mut table = DataTable::new(single_column(&["a"]), &TableOptions::default()).unwrap();
    table.search("zzz").unwrap();
    assert!(matches!(table.view().message, Some(ViewMessage::NoResults(_))));
}

#[test]
fn view_exposes_page_and_pager() {
    let values: Vec<String> = (1..=200).map(|i| i.to_string()).collect();
    let values: Vec<&str> = values.iter().map(String::as_str).collect();
    let mut table = DataTable::new(single_column(&values), &TableOptions::default()).unwrap();
    table.set_page(10);
    let view = table.view();
    assert_eq!(view.rows.len(), 10);
    assert_eq!(view.rows[0].index, 90);
    assert_eq!(view.rows[0].cells[0].display_text(), "91");
    assert_eq!(view.pager.first(), Some(&PagerItem::Prev { target: 9, disabled: false }));
    let pages: Vec<String> = view
        .pager
        .iter()
        .filter_map(|item| match item {
            PagerItem::Page { number, .. } => Some(number.to_string()),
            PagerItem::Ellipsis => Some("…".to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(pages.join(" "), "1 … 8 9 10 11 12 … 20");
}

#[test]
fn disabled_conversion_keeps_string_order() {
    let options = TableOptions {
        data_convert: Some(false),
        ..TableOptions::default()
    };
    let mut table = DataTable::new(single_column(&["10", "9", "100"]), &options).unwrap();
    assert_eq!(table.columns()[0].kind, ColumnType::String);
    table.sort(0, SortDirection::Asc).unwrap();
    // Strings still collate numerically by default.
    assert_eq!(table.visible_rows(), &[1, 0, 2]);
}

#[test]
fn reconfigured_column_drops_its_sort() {
    let mut table = DataTable::new(single_column(&["b", "a"]), &TableOptions::default()).unwrap();
    table.sort(0, SortDirection::Asc).unwrap();
    table
        .reconfigure_column(0, &ColumnOption::default().with_sortable(false))
        .unwrap();
    assert_eq!(table.sort_state(), None);
    assert_eq!(table.visible_rows(), &[0, 1]);
    assert!(!table.columns()[0].sortable);
}

#[test]
fn repeated_reconfiguration_keeps_one_entry_per_column() {
    let options =
        TableOptions::default().with_column(ColumnOption::new(vec![0, 1]).with_sortable(false));
    let mut table = DataTable::new(
        data(&["A", "B"], &[&["b", "x"], &["a", "y"]]),
        &options,
    )
    .unwrap();
    assert_eq!(table.config().columns.len(), 1);

    table
        .reconfigure_column(0, &ColumnOption::default().with_sortable(true))
        .unwrap();
    table
        .reconfigure_column(0, &ColumnOption::default().with_searchable(false))
        .unwrap();
    table
        .reconfigure_column(0, &ColumnOption::default().with_sortable(true))
        .unwrap();

    let entries = &table.config().columns;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].select, ColumnSelect::One(0));
    assert!(table.columns()[0].sortable);
    assert!(!table.columns()[0].searchable);
    assert!(!table.columns()[1].sortable);
    table.sort(0, SortDirection::Asc).unwrap();
    assert_eq!(table.visible_rows(), &[1, 0]);
}

#[test]
fn added_filter_restarts_the_column_cycle() {
    let terms = vec![
        FilterTerm::Literal(FilterLiteral::from("Yes")),
        FilterTerm::Literal(FilterLiteral::from("No")),
    ];
    let options =
        TableOptions::default().with_column(ColumnOption::new(0).with_filter(terms));
    let mut table = DataTable::new(single_column(&["Yes", "No", "Yes"]), &options).unwrap();

    table.cycle_filter(0).unwrap();
    table.cycle_filter(0).unwrap();
    assert_eq!(table.visible_rows(), &[1]);

    table
        .add_filter(ColumnFilter::new(
            0,
            vec![FilterTerm::Literal(FilterLiteral::from("No"))],
        ))
        .unwrap();
    assert_eq!(table.filters().len(), 2);

    assert!(table.cycle_filter(0).unwrap().is_some());
    assert_eq!(table.filters().len(), 1);
    assert_eq!(table.visible_rows(), &[0, 2]);
}

#[test]
fn table_locale_sets_string_order() {
    let words = ["zebra", "ähnlich", "apfel"];
    let swedish = TableOptions {
        locale: Some("sv".to_string()),
        ..TableOptions::default()
    };
    let mut table = DataTable::new(single_column(&words), &swedish).unwrap();
    assert_eq!(table.config().collation.locale, "sv");
    table.sort(0, SortDirection::Asc).unwrap();
    assert_eq!(table.visible_rows(), &[2, 0, 1]);

    let german = TableOptions {
        locale: Some("de".to_string()),
        ..TableOptions::default()
    };
    let mut table = DataTable::new(single_column(&words), &german).unwrap();
    table.sort(0, SortDirection::Asc).unwrap();
    assert_eq!(table.visible_rows(), &[1, 2, 0]);
}
