use std::sync::Arc;

use crate::domain::entities::board::Board;
use crate::domain::entities::edit::CardDraft;
use crate::domain::entities::layout::SheetLayout;
use crate::domain::entities::session::Session;
use crate::error::BoardError;
use crate::usecase::ports::sheet::SheetClient;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::query_service::QueryService;

/// What the presentation layer holds between actions: the session, the last
/// loaded board and a status line. Every successful change is followed by a
/// full reload, so `board` never carries stale row positions forward.
pub struct AppState {
    pub session: Session,
    pub board: Board,
    pub status: String,
    query: QueryService,
    edit: EditService,
}

impl AppState {
    pub fn open(
        client: Arc<dyn SheetClient>,
        layout: SheetLayout,
        session: Session,
    ) -> Result<Self, BoardError> {
        let query = QueryService::new(client.clone(), layout.clone());
        let edit = EditService::new(client, layout);
        let board = query.load()?;

        Ok(Self {
            session,
            board,
            status: "Ready".to_string(),
            query,
            edit,
        })
    }

    pub fn reload(&mut self) -> Result<(), BoardError> {
        self.board = self.query.load()?;
        Ok(())
    }

    /// Runs one change against the current snapshot, then reloads. A rejected
    /// change leaves both the sheet and `board` as they were.
    pub fn apply<F>(&mut self, done: &str, action: F) -> Result<(), BoardError>
    where
        F: FnOnce(&EditService, &Board) -> Result<(), BoardError>,
    {
        if let Err(err) = action(&self.edit, &self.board) {
            self.status = if err.is_validation() {
                format!("Warning: {err}")
            } else {
                format!("Error: {err}")
            };
            return Err(err);
        }

        self.reload()?;
        self.status = done.to_string();
        Ok(())
    }

    pub fn create_column(&mut self, name: &str) -> Result<(), BoardError> {
        self.apply(&format!("Column '{name}' created"), |edit, board| {
            edit.create_column(board, name)
        })
    }

    pub fn delete_column(&mut self, name: &str) -> Result<(), BoardError> {
        self.apply(&format!("Column '{name}' removed"), |edit, board| {
            edit.delete_column(board, name)
        })
    }

    pub fn reorder_columns(&mut self, new_order: &[String]) -> Result<(), BoardError> {
        self.apply("Columns reordered", |edit, board| {
            edit.reorder_columns(board, new_order)
        })
    }

    pub fn create_card(&mut self, draft: CardDraft) -> Result<(), BoardError> {
        self.apply("Card created", |edit, _| edit.create_card(draft))
    }

    pub fn update_card(&mut self, row_index: usize, draft: CardDraft) -> Result<(), BoardError> {
        self.apply("Card saved", |edit, board| {
            edit.update_card(board, row_index, draft)
        })
    }

    pub fn delete_card(&mut self, row_index: usize) -> Result<(), BoardError> {
        self.apply("Card deleted", |edit, board| edit.delete_card(board, row_index))
    }
}
