//! Terminal rendering of table views with `comfy-table`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabula_core::{DataTable, PagerItem, TableView, ViewColumn, ViewMessage};
use tabula_model::{ColumnType, RenderedTable, SortDirection, TableRenderKind};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Display text of every cell on the page after the column and row hooks.
pub fn rendered_rows(view: &TableView<'_>) -> Vec<Vec<String>> {
    view.rows
        .iter()
        .map(|row| {
            let mut rendered: Vec<String> = row
                .cells
                .iter()
                .zip(&view.columns)
                .map(|(cell, column)| {
                    column
                        .settings
                        .render
                        .as_ref()
                        .and_then(|render| render.render(cell, row.index, column.index))
                        .unwrap_or_else(|| cell.display_text().into_owned())
                })
                .collect();
            if let Some(render) = view.row_render {
                render.render(row.all_cells, row.index, &mut rendered);
            }
            rendered
        })
        .collect()
}

/// Heading text with an arrow on the sorted column.
pub fn heading_label(column: &ViewColumn<'_>) -> String {
    let title = column.heading.title_text();
    match column.sort {
        Some(SortDirection::Asc) => format!("{title} ▲"),
        Some(SortDirection::Desc) => format!("{title} ▼"),
        None => title.into_owned(),
    }
}

/// One-line pager, e.g. `‹ 1 … 8 9 [10] 11 12 … 20 ›`.
pub fn pager_line(items: &[PagerItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            PagerItem::First { .. } => "«".to_string(),
            PagerItem::Prev { .. } => "‹".to_string(),
            PagerItem::Page {
                number,
                active: true,
            } => format!("[{number}]"),
            PagerItem::Page { number, .. } => number.to_string(),
            PagerItem::Ellipsis => "…".to_string(),
            PagerItem::Next { .. } => "›".to_string(),
            PagerItem::Last { .. } => "»".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Headings and rendered rows of the page, before the table hook.
pub fn page_text(view: &TableView<'_>) -> RenderedTable {
    RenderedTable {
        headings: view.columns.iter().map(heading_label).collect(),
        rows: rendered_rows(view),
    }
}

pub fn view_table(view: &TableView<'_>) -> Table {
    let mut text = page_text(view);
    if let Some(render) = view.table_render {
        render.render(&mut text, TableRenderKind::Main);
    }
    let mut table = Table::new();
    table.set_header(
        text.headings
            .iter()
            .map(String::as_str)
            .map(header_cell)
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for (position, column) in view.columns.iter().enumerate() {
        if matches!(column.settings.kind, ColumnType::Number) {
            align_column(&mut table, position, CellAlignment::Right);
        }
    }
    for row in text.rows {
        table.add_row(row);
    }
    table
}

/// Empty-state text. The table hook sees the message as a single-cell row
/// under the headings; every remaining cell becomes one line.
fn message_text(view: &TableView<'_>, message: &ViewMessage) -> String {
    let mut text = RenderedTable {
        headings: view.columns.iter().map(heading_label).collect(),
        rows: vec![vec![message.text().to_string()]],
    };
    if let Some(render) = view.table_render {
        render.render(&mut text, TableRenderKind::Message);
    }
    text.rows
        .into_iter()
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The page table (or the empty-state message), the info label, and the
/// pager, one block per line.
pub fn render_view(view: &TableView<'_>) -> String {
    let mut lines = Vec::new();
    match &view.message {
        Some(message) => lines.push(message_text(view, message)),
        None => lines.push(view_table(view).to_string()),
    }
    lines.push(view.info.clone());
    let pager = pager_line(&view.pager);
    if !pager.is_empty() {
        lines.push(pager);
    }
    lines.join("\n")
}

/// Resolved settings of every column, hidden ones included.
pub fn columns_table(data: &DataTable) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Heading"),
        header_cell("Type"),
        header_cell("Sortable"),
        header_cell("Searchable"),
        header_cell("Hidden"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for settings in data.columns() {
        let heading = data
            .table()
            .headings()
            .get(settings.index)
            .map(|heading| heading.title_text().into_owned())
            .unwrap_or_default();
        let kind = if settings.inferred {
            format!("{} (inferred)", settings.kind.as_str())
        } else {
            settings.kind.as_str().to_string()
        };
        table.add_row(vec![
            Cell::new(settings.index),
            Cell::new(heading),
            Cell::new(kind),
            flag_cell(settings.sortable),
            flag_cell(settings.searchable),
            flag_cell(settings.hidden),
        ]);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(flag: bool) -> Cell {
    if flag {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::DarkGrey)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tabula_model::{DataOption, InputCell, TableOptions};

    use super::*;

    fn fruit() -> DataOption {
        DataOption {
            headings: Some(vec!["Fruit".to_string()]),
            data: Some(vec![
                vec![InputCell::from("apple")],
                vec![InputCell::from("pear")],
            ]),
        }
    }

    #[test]
    fn table_hook_shapes_page_and_message() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let options = TableOptions::default().with_table_render(
            move |table: &mut RenderedTable, kind: TableRenderKind| {
                log.lock().unwrap().push(kind);
                match kind {
                    TableRenderKind::Message => {
                        table.rows.push(vec!["Try a shorter query".to_string()]);
                    }
                    _ => {
                        for row in &mut table.rows {
                            row[0] = row[0].to_uppercase();
                        }
                        table.headings[0].push_str(" (all)");
                    }
                }
            },
        );
        let mut data = DataTable::new(fruit(), &options).unwrap();

        let page = render_view(&data.view());
        assert!(page.contains("APPLE"));
        assert!(page.contains("PEAR"));
        assert!(page.contains("Fruit (all)"));

        data.search("plum").unwrap();
        let empty = render_view(&data.view());
        let lines: Vec<&str> = empty.lines().collect();
        assert_eq!(lines[0], "No results match your search query");
        assert_eq!(lines[1], "Try a shorter query");
        assert_eq!(
            *seen.lock().unwrap(),
            [TableRenderKind::Main, TableRenderKind::Message]
        );
    }

    #[test]
    fn pager_line_marks_current_page() {
        let items = [
            PagerItem::Prev {
                target: 1,
                disabled: false,
            },
            PagerItem::Page {
                number: 1,
                active: false,
            },
            PagerItem::Page {
                number: 2,
                active: true,
            },
            PagerItem::Ellipsis,
            PagerItem::Page {
                number: 9,
                active: false,
            },
            PagerItem::Next {
                target: 3,
                disabled: false,
            },
        ];
        assert_eq!(pager_line(&items), "‹ 1 [2] … 9 ›");
        assert_eq!(pager_line(&[]), "");
    }
}
