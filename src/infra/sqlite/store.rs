use std::path::PathBuf;

use tracing::debug;

use crate::infra::sqlite::queries::{
    append_row, clear_sheet, create_sheet, delete_row, read_grid, update_cell, write_rows,
    MissingSheet, RowOutsideSheet,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::sheet::{SheetClient, SheetError};

/// Spreadsheet emulation in a local SQLite file. Tabs are rows of `sheet`,
/// cells are addressed by 1-based row and column like the remote store.
pub struct SqliteSheetStore {
    pub db_path: PathBuf,
}

impl SqliteSheetStore {
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, SheetError> {
        let db_path = db_path.into();
        init_db(&db_path).map_err(to_sheet_error)?;
        debug!(path = %db_path.display(), "opened local sheet store");
        Ok(Self { db_path })
    }
}

fn to_sheet_error(err: anyhow::Error) -> SheetError {
    if let Some(missing) = err.downcast_ref::<MissingSheet>() {
        return SheetError::MissingTab(missing.0.clone());
    }
    if let Some(outside) = err.downcast_ref::<RowOutsideSheet>() {
        return SheetError::RowOutOfRange {
            tab: outside.title.clone(),
            row: outside.row,
        };
    }
    SheetError::Unavailable(format!("{err:#}"))
}

impl SheetClient for SqliteSheetStore {
    fn ensure_tab(&self, tab: &str, headers: &[&str]) -> Result<(), SheetError> {
        let is_empty = create_sheet(&self.db_path, tab).map_err(to_sheet_error)?;
        if is_empty {
            let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
            write_rows(&self.db_path, tab, &[header_row]).map_err(to_sheet_error)?;
            debug!(tab, "wrote header to new tab");
        }
        Ok(())
    }

    fn read_values(&self, tab: &str) -> Result<Vec<Vec<String>>, SheetError> {
        read_grid(&self.db_path, tab).map_err(to_sheet_error)
    }

    fn append_row(&self, tab: &str, values: &[String]) -> Result<(), SheetError> {
        let row = append_row(&self.db_path, tab, values).map_err(to_sheet_error)?;
        debug!(tab, row, "appended row");
        Ok(())
    }

    fn update_cell(
        &self,
        tab: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), SheetError> {
        if row == 0 || col == 0 {
            return Err(SheetError::RowOutOfRange {
                tab: tab.to_string(),
                row,
            });
        }
        update_cell(&self.db_path, tab, row, col, value).map_err(to_sheet_error)
    }

    fn delete_row(&self, tab: &str, row: usize) -> Result<(), SheetError> {
        delete_row(&self.db_path, tab, row).map_err(to_sheet_error)
    }

    fn clear(&self, tab: &str) -> Result<(), SheetError> {
        clear_sheet(&self.db_path, tab).map_err(to_sheet_error)
    }

    fn write_rows(&self, tab: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        write_rows(&self.db_path, tab, rows).map_err(to_sheet_error)
    }
}
