use tabula_ingest::{DateFormat, infer_type, resolve_column};
use tabula_model::{
    Cell, ColumnOption, ColumnType, Sensitivity, SortDirection, TableConfig, TableOptions,
};

fn cells(texts: &[&str]) -> Vec<Cell> {
    texts.iter().map(|text| Cell::new(*text)).collect()
}

#[test]
fn configured_date_format_drives_inference() {
    let sample = cells(&["15/01/2023", "03/03/2023"]);
    let format = DateFormat::new("DD/MM/YYYY");
    assert_eq!(infer_type(&sample, Some(&format)), ColumnType::Date);
    assert_eq!(
        infer_type(&cells(&["2023-01-15"]), Some(&format)),
        ColumnType::String
    );
}

#[test]
fn inference_is_deterministic() {
    let sample = cells(&["10", "", "2.5", "-3"]);
    let first = infer_type(&sample, None);
    for _ in 0..3 {
        assert_eq!(infer_type(&sample, None), first);
    }
    assert_eq!(first, ColumnType::Number);
}

#[test]
fn column_options_override_table_defaults() {
    let options = TableOptions {
        sortable: Some(false),
        ..TableOptions::default()
    }
    .with_column(
        ColumnOption::new(1)
            .with_sortable(true)
            .with_sensitivity(Sensitivity::Case)
            .with_sort(SortDirection::Desc)
            .with_sort_cycle(Vec::new()),
    );
    let config = TableConfig::resolve(&options).unwrap();

    let other = resolve_column(0, &cells(&["x"]), &config.column_option(0), &config);
    assert!(!other.sortable);
    assert_eq!(other.collation.sensitivity, Sensitivity::Base);

    let settings = resolve_column(1, &cells(&["1"]), &config.column_option(1), &config);
    assert!(settings.sortable);
    assert!(settings.inferred);
    assert_eq!(settings.kind, ColumnType::Number);
    assert_eq!(settings.collation.sensitivity, Sensitivity::Case);
    assert_eq!(settings.sort, Some(SortDirection::Desc));
    assert_eq!(
        settings.sort_cycle,
        vec![SortDirection::Asc, SortDirection::Desc]
    );
}
