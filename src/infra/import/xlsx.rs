use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// Reads the named worksheets of a workbook as grids anchored at `A1`, so
/// row positions match the spreadsheet the file was exported from.
pub fn read_workbook_tabs(
    xlsx_path: &Path,
    tabs: &[&str],
) -> Result<Vec<(String, Vec<Vec<String>>)>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open xlsx: {}", xlsx_path.display()))?;

    let mut loaded = Vec::with_capacity(tabs.len());
    for tab in tabs {
        let range = workbook
            .worksheet_range(tab)
            .with_context(|| format!("failed to read sheet: {tab}"))?;

        let (top, left) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<String>> = vec![Vec::new(); top];
        for row in range.rows() {
            let mut cells = vec![String::new(); left];
            cells.extend(row.iter().map(cell_to_string));
            trim_trailing_empty(&mut cells);
            rows.push(cells);
        }
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }

        loaded.push((tab.to_string(), rows));
    }

    Ok(loaded)
}

pub fn trim_trailing_empty(cells: &mut Vec<String>) {
    while cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
}
