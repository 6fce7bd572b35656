use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sheet (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS cell (
            sheet_id    INTEGER NOT NULL,
            row_num     INTEGER NOT NULL,
            col_num     INTEGER NOT NULL,
            value       TEXT NOT NULL,
            PRIMARY KEY (sheet_id, row_num, col_num),
            FOREIGN KEY (sheet_id) REFERENCES sheet(id)
        );

        CREATE INDEX IF NOT EXISTS idx_cell_sheet_row
            ON cell(sheet_id, row_num);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
