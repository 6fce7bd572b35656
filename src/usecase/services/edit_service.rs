use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::board::Board;
use crate::domain::entities::edit::CardDraft;
use crate::domain::entities::layout::{
    sheet_row, SheetLayout, COLUMN_COL, CONTENT_COL, LIST_HEADER, TITLE_COL,
};
use crate::error::{BoardError, ValidationError};
use crate::usecase::ports::sheet::SheetClient;

/// Applies board changes to the spreadsheet.
///
/// Preconditions are checked against the `board` snapshot passed in, which
/// must come from the latest load. Operations that need several calls are not
/// transactional: the first failing call aborts the rest.
pub struct EditService {
    client: Arc<dyn SheetClient>,
    layout: SheetLayout,
}

impl EditService {
    pub fn new(client: Arc<dyn SheetClient>, layout: SheetLayout) -> Self {
        Self { client, layout }
    }

    pub fn create_column(&self, board: &Board, name: &str) -> Result<(), BoardError> {
        if name.is_empty() {
            return Err(reject(ValidationError::EmptyColumnName));
        }
        if board.has_column(name) {
            return Err(reject(ValidationError::DuplicateColumn(name.to_string())));
        }

        self.client
            .append_row(&self.layout.columns_tab, &[name.to_string()])?;
        info!(column = name, "created column");
        Ok(())
    }

    /// Removes the column row. Cards still pointing at it are left alone and
    /// become orphans.
    pub fn delete_column(&self, board: &Board, name: &str) -> Result<(), BoardError> {
        if !board.has_column(name) {
            return Err(reject(ValidationError::UnknownColumn(name.to_string())));
        }

        let row = self
            .client
            .find_data_row(&self.layout.columns_tab, 1, name)?
            .ok_or_else(|| reject(ValidationError::UnknownColumn(name.to_string())))?;
        self.client.delete_row(&self.layout.columns_tab, row)?;

        let orphaned = board.cards_in(name).count();
        info!(column = name, row, orphaned, "deleted column");
        Ok(())
    }

    /// Clears the columns tab and writes it back in `new_order`.
    pub fn reorder_columns(&self, board: &Board, new_order: &[String]) -> Result<(), BoardError> {
        if !is_permutation(&board.column_names, new_order) {
            return Err(reject(ValidationError::NotAPermutation {
                expected: board.column_names.clone(),
                actual: new_order.to_vec(),
            }));
        }

        let mut rows = Vec::with_capacity(new_order.len() + 1);
        rows.push(vec![LIST_HEADER.to_string()]);
        rows.extend(new_order.iter().map(|name| vec![name.clone()]));

        self.client.clear(&self.layout.columns_tab)?;
        self.client.write_rows(&self.layout.columns_tab, &rows)?;
        info!(order = ?new_order, "reordered columns");
        Ok(())
    }

    pub fn create_card(&self, draft: CardDraft) -> Result<(), BoardError> {
        if draft.title.is_empty() {
            return Err(reject(ValidationError::EmptyTitle));
        }

        let column = draft.column.clone();
        self.client
            .append_row(&self.layout.cards_tab, &draft.into_row())?;
        info!(column = %column, "created card");
        Ok(())
    }

    /// Overwrites the three cells of the card at `row_index`. If the tab
    /// changed since `board` was loaded, this writes to whatever row now sits
    /// at that position.
    pub fn update_card(
        &self,
        board: &Board,
        row_index: usize,
        draft: CardDraft,
    ) -> Result<(), BoardError> {
        ensure_loaded(board, row_index)?;

        let row = sheet_row(row_index);
        let tab = &self.layout.cards_tab;
        self.client.update_cell(tab, row, TITLE_COL, &draft.title)?;
        self.client.update_cell(tab, row, CONTENT_COL, &draft.content)?;
        self.client.update_cell(tab, row, COLUMN_COL, &draft.column)?;
        info!(row_index, row, column = %draft.column, "updated card");
        Ok(())
    }

    /// Deletes the card row. Every later card moves up one position, so the
    /// board must be reloaded before the next positional call.
    pub fn delete_card(&self, board: &Board, row_index: usize) -> Result<(), BoardError> {
        ensure_loaded(board, row_index)?;

        let row = sheet_row(row_index);
        self.client.delete_row(&self.layout.cards_tab, row)?;
        info!(row_index, row, "deleted card");
        Ok(())
    }
}

fn reject(err: ValidationError) -> BoardError {
    warn!(reason = %err, "rejected board change");
    BoardError::Validation(err)
}

fn ensure_loaded(board: &Board, row_index: usize) -> Result<(), BoardError> {
    if board.card(row_index).is_none() {
        return Err(reject(ValidationError::CardNotLoaded {
            row_index,
            loaded: board.cards.len(),
        }));
    }
    Ok(())
}

pub fn is_permutation(current: &[String], new_order: &[String]) -> bool {
    if current.len() != new_order.len() {
        return false;
    }
    let mut expected: Vec<&str> = current.iter().map(String::as_str).collect();
    let mut actual: Vec<&str> = new_order.iter().map(String::as_str).collect();
    expected.sort_unstable();
    actual.sort_unstable();
    expected == actual
}
