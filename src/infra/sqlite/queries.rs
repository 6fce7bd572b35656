use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::infra::sqlite::schema::open_connection;

#[derive(Debug, thiserror::Error)]
#[error("sheet not found: {0}")]
pub struct MissingSheet(pub String);

#[derive(Debug, thiserror::Error)]
#[error("row {row} is outside sheet {title}")]
pub struct RowOutsideSheet {
    pub title: String,
    pub row: usize,
}

fn sheet_id(conn: &Connection, title: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM sheet WHERE title = ?1", [title], |row| {
        row.get(0)
    })
    .optional()
    .context("failed to look up sheet")?
    .ok_or_else(|| MissingSheet(title.to_string()).into())
}

fn last_row(conn: &Connection, sheet_id: i64) -> Result<usize> {
    let last: Option<i64> = conn
        .query_row(
            "SELECT MAX(row_num) FROM cell WHERE sheet_id = ?1",
            [sheet_id],
            |row| row.get(0),
        )
        .context("failed to read last row")?;
    Ok(last.unwrap_or(0) as usize)
}

/// Stores one cell. Empty values remove the cell so trailing blanks never
/// count as data.
fn put_cell(
    conn: &Connection,
    sheet_id: i64,
    row: usize,
    col: usize,
    value: &str,
) -> Result<()> {
    if value.is_empty() {
        conn.execute(
            "DELETE FROM cell WHERE sheet_id = ?1 AND row_num = ?2 AND col_num = ?3",
            params![sheet_id, row as i64, col as i64],
        )
        .context("failed to clear cell")?;
    } else {
        conn.execute(
            "INSERT INTO cell(sheet_id, row_num, col_num, value)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(sheet_id, row_num, col_num) DO UPDATE SET value = excluded.value",
            params![sheet_id, row as i64, col as i64, value],
        )
        .context("failed to upsert cell")?;
    }
    Ok(())
}

/// Creates the sheet if needed and returns whether it holds no cells.
pub fn create_sheet(db_path: &Path, title: &str) -> Result<bool> {
    let conn = open_connection(db_path)?;
    conn.execute("INSERT OR IGNORE INTO sheet(title) VALUES (?1)", [title])
        .context("failed to insert sheet")?;
    let id = sheet_id(&conn, title)?;
    Ok(last_row(&conn, id)? == 0)
}

/// Dense grid of the sheet from row 1 to its last non-empty row.
pub fn read_grid(db_path: &Path, title: &str) -> Result<Vec<Vec<String>>> {
    let conn = open_connection(db_path)?;
    let id = sheet_id(&conn, title)?;

    let mut stmt = conn
        .prepare(
            "SELECT row_num, col_num, value
             FROM cell
             WHERE sheet_id = ?1
             ORDER BY row_num ASC, col_num ASC",
        )
        .context("failed to prepare cell query")?;
    let cell_iter = stmt
        .query_map([id], |row| {
            let row_num: i64 = row.get(0)?;
            let col_num: i64 = row.get(1)?;
            let value: String = row.get(2)?;
            Ok((row_num as usize, col_num as usize, value))
        })
        .context("failed to query cells")?;

    let mut grid: Vec<Vec<String>> = Vec::new();
    for item in cell_iter {
        let (row_num, col_num, value) = item.context("failed to read cell row")?;
        if grid.len() < row_num {
            grid.resize_with(row_num, Vec::new);
        }
        let cells = &mut grid[row_num - 1];
        if cells.len() < col_num {
            cells.resize(col_num, String::new());
        }
        cells[col_num - 1] = value;
    }

    Ok(grid)
}

/// Writes `values` on the row after the last non-empty one and returns its
/// row number.
pub fn append_row(db_path: &Path, title: &str, values: &[String]) -> Result<usize> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start append transaction")?;
    let id = sheet_id(&tx, title)?;
    let row = last_row(&tx, id)? + 1;

    for (idx, value) in values.iter().enumerate() {
        put_cell(&tx, id, row, idx + 1, value)?;
    }

    tx.commit().context("failed to commit appended row")?;
    Ok(row)
}

pub fn update_cell(db_path: &Path, title: &str, row: usize, col: usize, value: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    let id = sheet_id(&conn, title)?;
    put_cell(&conn, id, row, col, value)
}

/// Deletes `row` and moves every row below it up by one.
pub fn delete_row(db_path: &Path, title: &str, row: usize) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start delete transaction")?;
    let id = sheet_id(&tx, title)?;

    if row == 0 || row > last_row(&tx, id)? {
        return Err(RowOutsideSheet {
            title: title.to_string(),
            row,
        }
        .into());
    }

    tx.execute(
        "DELETE FROM cell WHERE sheet_id = ?1 AND row_num = ?2",
        params![id, row as i64],
    )
    .context("failed to delete row cells")?;

    // Shift through negative numbers so the primary key never collides
    // mid-update.
    tx.execute(
        "UPDATE cell SET row_num = -(row_num - 1) WHERE sheet_id = ?1 AND row_num > ?2",
        params![id, row as i64],
    )
    .context("failed to shift rows up")?;
    tx.execute(
        "UPDATE cell SET row_num = -row_num WHERE sheet_id = ?1 AND row_num < 0",
        [id],
    )
    .context("failed to restore shifted row numbers")?;

    tx.commit().context("failed to commit row delete")?;
    Ok(())
}

pub fn clear_sheet(db_path: &Path, title: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    let id = sheet_id(&conn, title)?;
    conn.execute("DELETE FROM cell WHERE sheet_id = ?1", [id])
        .context("failed to clear sheet")?;
    Ok(())
}

/// Writes `rows` from `A1` down, overwriting what is there.
pub fn write_rows(db_path: &Path, title: &str, rows: &[Vec<String>]) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start write transaction")?;
    let id = sheet_id(&tx, title)?;

    for (row_idx, cells) in rows.iter().enumerate() {
        for (col_idx, value) in cells.iter().enumerate() {
            put_cell(&tx, id, row_idx + 1, col_idx + 1, value)?;
        }
    }

    tx.commit().context("failed to commit written rows")?;
    Ok(())
}
