use tabula_ingest::{normalize_data, normalize_rows};
use tabula_model::{CellError, DataOption, InputCell, RawValue, TableError};

fn row(values: &[&str]) -> Vec<InputCell> {
    values.iter().map(|value| InputCell::from(*value)).collect()
}

#[test]
fn headings_define_width() {
    let data = DataOption {
        headings: Some(vec!["A".to_string(), "B".to_string()]),
        data: Some(vec![row(&["1", "2"]), row(&["3"])]),
    };
    let err = normalize_data(data).unwrap_err();
    assert_eq!(
        err,
        TableError::ColumnCountMismatch {
            row: 1,
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn first_row_defines_width_without_headings() {
    let data = DataOption {
        headings: None,
        data: Some(vec![row(&["a", "b", "c"]), row(&["d", "e", "f"])]),
    };
    let normalized = normalize_data(data).unwrap();
    assert!(!normalized.has_headings);
    assert_eq!(normalized.table.column_count(), 3);
    assert!(
        normalized
            .table
            .headings()
            .iter()
            .all(|heading| heading.title_text().is_empty())
    );
}

#[test]
fn missing_input_is_an_empty_table() {
    let normalized = normalize_data(DataOption::default()).unwrap();
    assert_eq!(normalized.table.column_count(), 0);
    assert!(normalized.table.is_empty());
}

#[test]
fn invalid_cell_is_located() {
    let rows = vec![
        row(&["ok"]),
        vec![InputCell::Structured {
            data: None,
            text: None,
            order: None,
        }],
    ];
    let err = normalize_rows(rows, 1, 5).unwrap_err();
    assert_eq!(
        err,
        TableError::InvalidCell {
            row: 6,
            column: 0,
            source: CellError::MissingData
        }
    );
}

#[test]
fn markup_heading_is_flagged() {
    let data = DataOption {
        headings: Some(vec!["<b>Name</b>".to_string(), "a < b".to_string()]),
        data: None,
    };
    let normalized = normalize_data(data).unwrap();
    let headings = normalized.table.headings();
    assert!(headings[0].html);
    assert_eq!(headings[0].title_text(), "Name");
    assert!(!headings[1].html);
    assert_eq!(headings[1].title, RawValue::Text("a < b".to_string()));
}
