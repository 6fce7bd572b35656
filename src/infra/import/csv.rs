use std::path::Path;

use anyhow::{Context, Result};

use crate::infra::import::xlsx::trim_trailing_empty;

/// Reads every record of a CSV file, header line included, as raw rows.
pub fn read_csv_rows(csv_path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        trim_trailing_empty(&mut cells);
        rows.push(cells);
    }

    if rows.is_empty() {
        anyhow::bail!("csv header is required")
    }

    Ok(rows)
}
