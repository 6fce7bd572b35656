use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use crate::domain::entities::layout::{SheetLayout, HEADER_ROWS};
use crate::infra::import::csv::read_csv_rows;
use crate::infra::import::xlsx::read_workbook_tabs;
use crate::usecase::ports::sheet::SheetClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub tab: String,
    pub row_count: usize,
}

/// Replaces board tabs with rows taken from exported files.
pub struct ImportService {
    client: Arc<dyn SheetClient>,
    layout: SheetLayout,
}

impl ImportService {
    pub fn new(client: Arc<dyn SheetClient>, layout: SheetLayout) -> Self {
        Self { client, layout }
    }

    /// Loads both board tabs from an `.xlsx` download of the spreadsheet.
    /// Nothing is written unless both worksheets pass the header check.
    pub fn import_xlsx(&self, path: &Path) -> Result<Vec<ImportResult>> {
        let tabs = [
            self.layout.columns_tab.as_str(),
            self.layout.cards_tab.as_str(),
        ];
        let loaded = read_workbook_tabs(path, &tabs)?;
        for (tab, rows) in &loaded {
            self.check_header(tab, rows)?;
        }

        loaded
            .into_iter()
            .map(|(tab, rows)| self.replace_tab(tab, rows))
            .collect()
    }

    pub fn import_csv(&self, tab: &str, path: &Path) -> Result<ImportResult> {
        let rows = read_csv_rows(path)?;
        self.check_header(tab, &rows)?;
        self.replace_tab(tab.to_string(), rows)
    }

    fn check_header(&self, tab: &str, rows: &[Vec<String>]) -> Result<()> {
        let Some(expected) = self.layout.headers_for(tab) else {
            bail!("'{tab}' is not a board tab");
        };
        let header = rows.first().map(Vec::as_slice).unwrap_or_default();
        let matches = expected.len() <= header.len()
            && expected
                .iter()
                .zip(header)
                .all(|(expected, actual)| *expected == actual.trim());
        if !matches {
            bail!("tab '{tab}' must start with header {expected:?}, found {header:?}");
        }
        Ok(())
    }

    fn replace_tab(&self, tab: String, rows: Vec<Vec<String>>) -> Result<ImportResult> {
        self.client.clear(&tab)?;
        self.client.write_rows(&tab, &rows)?;

        let row_count = rows.len().saturating_sub(HEADER_ROWS);
        info!(tab = %tab, row_count, "imported tab");
        Ok(ImportResult { tab, row_count })
    }
}
