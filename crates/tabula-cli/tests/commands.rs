//! End-to-end runs of the `tabula` subcommands against CSV files on disk.

use std::fs;
use std::path::PathBuf;

use insta::assert_snapshot;
use tempfile::TempDir;

use tabula_cli::commands::{load_options, run_columns, run_view};
use tabula_cli::query::{ColumnRef, FilterArg, PerPageArg, SortArg, ViewQuery};
use tabula_model::SortDirection;

fn write_inventory(dir: &TempDir) -> PathBuf {
    let mut csv = String::from("name,price,status\n");
    for i in 1..=23 {
        let status = if i % 2 == 0 { "closed" } else { "open" };
        csv.push_str(&format!("item{i:02},\"${}.50\",{status}\n", i * 3));
    }
    let path = dir.path().join("inventory.csv");
    fs::write(&path, csv).unwrap();
    path
}

/// Info label and pager, the last lines of the output.
fn footer(output: &str) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let info = lines
        .iter()
        .position(|line| line.starts_with("Showing"))
        .unwrap();
    lines[info..].join(" | ")
}

#[test]
fn last_page_of_default_view() {
    let dir = TempDir::new().unwrap();
    let csv = write_inventory(&dir);
    let query = ViewQuery {
        page: Some(3),
        ..ViewQuery::default()
    };
    let output = run_view(&csv, None, &query).unwrap();
    assert!(output.contains("item21"));
    assert!(output.contains("item23"));
    assert!(!output.contains("item20"));
    assert_snapshot!(footer(&output), @"Showing 21 to 23 of 23 entries | ‹ 1 2 [3] ›");
}

#[test]
fn sort_by_decorated_price_descending() {
    let dir = TempDir::new().unwrap();
    let csv = write_inventory(&dir);
    let query = ViewQuery {
        sort: Some(SortArg {
            column: ColumnRef::Title("price".to_string()),
            direction: SortDirection::Desc,
        }),
        per_page: Some(PerPageArg::Rows(5)),
        ..ViewQuery::default()
    };
    let output = run_view(&csv, None, &query).unwrap();
    assert!(output.contains("price ▼"));
    assert!(output.contains("item23"));
    assert!(output.contains("item19"));
    assert!(!output.contains("item18"));
    assert_snapshot!(
        footer(&output),
        @"Showing 1 to 5 of 23 entries | ‹ [1] 2 3 4 5 ›"
    );
}

#[test]
fn filter_and_search_combine() {
    let dir = TempDir::new().unwrap();
    let csv = write_inventory(&dir);
    let query = ViewQuery {
        search: Some("item2".to_string()),
        filters: vec!["status=closed".parse::<FilterArg>().unwrap()],
        ..ViewQuery::default()
    };
    let output = run_view(&csv, None, &query).unwrap();
    assert!(output.contains("item20"));
    assert!(output.contains("item22"));
    assert!(!output.contains("item21"));
    assert_snapshot!(footer(&output), @"Showing 1 to 2 of 2 entries");
}

#[test]
fn no_match_prints_message() {
    let dir = TempDir::new().unwrap();
    let csv = write_inventory(&dir);
    let query = ViewQuery {
        search: Some("widget".to_string()),
        ..ViewQuery::default()
    };
    let output = run_view(&csv, None, &query).unwrap();
    assert!(output.starts_with("No results match your search query"));
    assert_snapshot!(footer(&output), @"Showing 0 to 0 of 0 entries");
}

#[test]
fn options_file_hides_columns_and_sets_page_size() {
    let dir = TempDir::new().unwrap();
    let csv = write_inventory(&dir);
    let config = dir.path().join("options.json");
    fs::write(
        &config,
        r#"{ "perPage": 20, "columns": [{ "select": 2, "hidden": true }] }"#,
    )
    .unwrap();
    let output = run_view(&csv, Some(&config), &ViewQuery::default()).unwrap();
    assert!(output.contains("name"));
    assert!(!output.contains("status"));
    assert!(!output.contains("closed"));
    assert_snapshot!(footer(&output), @"Showing 1 to 20 of 23 entries | ‹ [1] 2 ›");
}

#[test]
fn unknown_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let csv = write_inventory(&dir);
    let query = ViewQuery {
        sort: Some("quantity".parse().unwrap()),
        ..ViewQuery::default()
    };
    let err = run_view(&csv, None, &query).unwrap_err();
    assert!(err.to_string().contains("quantity"));
}

#[test]
fn columns_report_inferred_types() {
    let dir = TempDir::new().unwrap();
    let csv = write_inventory(&dir);
    let output = run_columns(&csv, None).unwrap();
    assert!(output.contains("number (inferred)"));
    assert!(output.contains("string (inferred)"));
    assert!(output.contains("status"));
}

#[test]
fn malformed_options_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.json");
    fs::write(&config, "{ perPage: ").unwrap();
    let err = load_options(Some(&config)).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}
