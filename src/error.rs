//! Error types for board operations.

use thiserror::Error;

use crate::usecase::ports::sheet::SheetError;

/// Rejections that leave the board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("card title is required")]
    EmptyTitle,

    #[error("column name is required")]
    EmptyColumnName,

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("new order must list every column exactly once (expected {expected:?}, got {actual:?})")]
    NotAPermutation {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("no card at position {row_index} (board has {loaded} cards)")]
    CardNotLoaded { row_index: usize, loaded: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The backing spreadsheet could not be reached or refused a call.
    #[error("connection error: {0}")]
    Connection(#[from] SheetError),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl BoardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, BoardError::Validation(_))
    }
}
