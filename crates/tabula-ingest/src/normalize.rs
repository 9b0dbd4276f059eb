//! Cell normalization: caller input to canonical [`Cell`] records.

use tabula_model::{
    Cell, CellError, DataOption, HeaderCell, InputCell, MarkupNode, RawValue, Result, SortValue,
    Table, TableError, flatten_text, parse_fragment,
};

/// Normalized table plus whether the input supplied headings.
#[derive(Debug, Clone)]
pub struct NormalizedData {
    pub table: Table,
    pub has_headings: bool,
}

/// Converts one input cell. Primitives are wrapped as-is; markup keeps its
/// tree and gains a flattened text form when no explicit text was given.
pub fn normalize(input: InputCell) -> std::result::Result<Cell, CellError> {
    match input {
        InputCell::Text(text) => Ok(Cell::new(text)),
        InputCell::Number(number) => Ok(Cell::new(number)),
        InputCell::Bool(flag) => Ok(Cell::new(flag)),
        InputCell::Markup(nodes) => Ok(markup_cell(nodes, None, None)),
        InputCell::Structured { data, text, order } => match data.ok_or(CellError::MissingData)? {
            RawValue::Markup(nodes) => Ok(markup_cell(nodes, text, order)),
            value => Ok(Cell { value, text, order }),
        },
    }
}

fn markup_cell(nodes: Vec<MarkupNode>, text: Option<String>, order: Option<SortValue>) -> Cell {
    let text = text.unwrap_or_else(|| flatten_text(&nodes));
    Cell {
        value: RawValue::Markup(nodes),
        text: Some(text),
        order,
    }
}

/// Heading from a plain string; strings containing elements become markup.
pub fn normalize_heading(title: &str) -> HeaderCell {
    if title.contains('<') {
        let nodes = parse_fragment(title);
        if nodes
            .iter()
            .any(|node| matches!(node, MarkupNode::Element(_)))
        {
            return HeaderCell::markup(nodes);
        }
    }
    HeaderCell::new(title)
}

/// Normalizes rows that must each have `width` cells. `offset` is the
/// absolute index of the first row, used in errors. Nothing is returned
/// unless every row is valid.
pub fn normalize_rows(
    rows: Vec<Vec<InputCell>>,
    width: usize,
    offset: usize,
) -> Result<Vec<Vec<Cell>>> {
    let mut normalized = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        let row_index = offset + idx;
        if row.len() != width {
            return Err(TableError::ColumnCountMismatch {
                row: row_index,
                expected: width,
                found: row.len(),
            });
        }
        let cells = row
            .into_iter()
            .enumerate()
            .map(|(column, input)| {
                normalize(input).map_err(|source| TableError::InvalidCell {
                    row: row_index,
                    column,
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        normalized.push(cells);
    }
    Ok(normalized)
}

/// Builds a [`Table`] from loosely shaped input. Without headings the first
/// row decides the column count and every title is empty.
pub fn normalize_data(data: DataOption) -> Result<NormalizedData> {
    let rows = data.data.unwrap_or_default();
    let has_headings = data.headings.is_some();
    let headings: Vec<HeaderCell> = match data.headings {
        Some(titles) => titles.iter().map(|title| normalize_heading(title)).collect(),
        None => {
            let width = rows.first().map_or(0, Vec::len);
            (0..width).map(|_| HeaderCell::new("")).collect()
        }
    };
    let cells = normalize_rows(rows, headings.len(), 0)?;
    let table = Table::new(headings, cells)?;
    Ok(NormalizedData {
        table,
        has_headings,
    })
}

/// Reinterprets a text cell as markup, for columns configured as `html`.
pub fn convert_to_markup(cell: &mut Cell) {
    if let RawValue::Text(source) = &cell.value {
        let nodes = parse_fragment(source);
        if cell.text.is_none() {
            cell.text = Some(flatten_text(&nodes));
        }
        cell.value = RawValue::Markup(nodes);
    }
}
