use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::board::{Board, Card};
use crate::domain::entities::layout::{
    SheetLayout, COLUMN_HEADER, CONTENT_HEADER, LIST_HEADER, TITLE_HEADER,
};
use crate::error::BoardError;
use crate::usecase::ports::sheet::{Record, SheetClient};

pub struct QueryService {
    client: Arc<dyn SheetClient>,
    layout: SheetLayout,
}

impl QueryService {
    pub fn new(client: Arc<dyn SheetClient>, layout: SheetLayout) -> Self {
        Self { client, layout }
    }

    /// Reads both tabs and builds a fresh board. Either tab failing fails the
    /// whole load.
    pub fn load(&self) -> Result<Board, BoardError> {
        let column_records = self.client.get_all_records(&self.layout.columns_tab)?;
        let card_records = self.client.get_all_records(&self.layout.cards_tab)?;

        let board = build_board(&column_records, &card_records);
        debug!(
            columns = board.column_names.len(),
            cards = board.cards.len(),
            "loaded board"
        );
        Ok(board)
    }
}

pub fn build_board(column_records: &[Record], card_records: &[Record]) -> Board {
    let column_names = column_records
        .iter()
        .map(|record| record.get(LIST_HEADER))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    let cards = card_records
        .iter()
        .enumerate()
        .map(|(row_index, record)| Card {
            row_index,
            title: record.get(TITLE_HEADER).to_string(),
            content: record.get(CONTENT_HEADER).to_string(),
            column: record.get(COLUMN_HEADER).to_string(),
        })
        .collect();

    Board {
        column_names,
        cards,
    }
}
