use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::entities::layout::HEADER_ROWS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("spreadsheet unavailable: {0}")]
    Unavailable(String),
    #[error("tab not found: {0}")]
    MissingTab(String),
    #[error("row {row} is outside tab {tab}")]
    RowOutOfRange { tab: String, row: usize },
}

/// Row-level access to the tabs of one spreadsheet.
///
/// Rows and columns are 1-based and count the header row, matching what a
/// user sees in the spreadsheet UI.
pub trait SheetClient: Send + Sync {
    /// Fails with [`SheetError::MissingTab`] when `tab` is absent and cannot be
    /// created. Stores that create tabs also write `headers` into an empty one.
    fn ensure_tab(&self, tab: &str, headers: &[&str]) -> Result<(), SheetError>;

    /// Every row of `tab`, header included. Blank rows in the middle of the
    /// data come back as empty vectors.
    fn read_values(&self, tab: &str) -> Result<Vec<Vec<String>>, SheetError>;

    fn append_row(&self, tab: &str, values: &[String]) -> Result<(), SheetError>;

    fn update_cell(&self, tab: &str, row: usize, col: usize, value: &str)
        -> Result<(), SheetError>;

    /// Removes `row`; every row below it moves up by one.
    fn delete_row(&self, tab: &str, row: usize) -> Result<(), SheetError>;

    fn clear(&self, tab: &str) -> Result<(), SheetError>;

    /// Writes `rows` starting at the top-left cell of `tab`.
    fn write_rows(&self, tab: &str, rows: &[Vec<String>]) -> Result<(), SheetError>;

    fn get_all_records(&self, tab: &str) -> Result<Vec<Record>, SheetError> {
        let values = self.read_values(tab)?;
        Ok(records_from_values(&values))
    }

    /// Sheet row of the first data row whose cell at `col` equals `value`.
    fn find_data_row(
        &self,
        tab: &str,
        col: usize,
        value: &str,
    ) -> Result<Option<usize>, SheetError> {
        let values = self.read_values(tab)?;
        let found = values
            .iter()
            .enumerate()
            .skip(HEADER_ROWS)
            .find(|(_, row)| row.get(col.saturating_sub(1)).map(String::as_str) == Some(value))
            .map(|(idx, _)| idx + 1);
        Ok(found)
    }
}

/// One data row keyed by the header of its tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: BTreeMap<String, String>,
}

impl Record {
    /// Cell under `header`, or an empty string when the header or cell is
    /// missing.
    pub fn get(&self, header: &str) -> &str {
        self.cells.get(header).map(String::as_str).unwrap_or("")
    }
}

/// Turns a raw grid into records, using the first row as keys.
pub fn records_from_values(values: &[Vec<String>]) -> Vec<Record> {
    let Some((headers, rows)) = values.split_first() else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| {
            let cells = headers
                .iter()
                .enumerate()
                .map(|(idx, header)| (header.clone(), row.get(idx).cloned().unwrap_or_default()))
                .collect();
            Record { cells }
        })
        .collect()
}
