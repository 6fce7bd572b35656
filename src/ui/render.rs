use std::fmt::Write;

use crate::domain::entities::board::{Board, Card};

pub const EMPTY_BOARD_HINT: &str =
    "No columns yet. Create the first one with `jotinha column add <name>`.";

/// Plain-text board: one block per column, cards prefixed with the position
/// used by `card edit` and `card delete`.
pub fn render_board(board: &Board) -> String {
    if board.is_empty() {
        return format!("{EMPTY_BOARD_HINT}\n");
    }

    let mut out = String::new();
    for lane in board.lanes() {
        let _ = writeln!(out, "## {}", lane.name);
        if lane.cards.is_empty() {
            let _ = writeln!(out, "   (empty)");
        }
        for card in lane.cards {
            let _ = writeln!(out, "[{}] {}", card.row_index, card.title);
            let preview = card.preview();
            if !preview.is_empty() {
                let _ = writeln!(out, "    {preview}");
            }
        }
        out.push('\n');
    }

    let orphaned = board.orphaned_cards().len();
    if orphaned > 0 {
        let _ = writeln!(out, "({orphaned} card(s) belong to deleted columns)");
    }
    out
}

pub fn render_card(card: &Card) -> String {
    format!(
        "[{}] {}\nColumn: {}\n\n{}\n",
        card.row_index, card.title, card.column, card.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_shows_hint() {
        assert_eq!(render_board(&Board::default()), format!("{EMPTY_BOARD_HINT}\n"));
    }

    #[test]
    fn board_lists_cards_under_their_column() {
        let board = Board {
            column_names: vec!["Todo".to_string(), "Done".to_string()],
            cards: vec![
                Card {
                    row_index: 0,
                    title: "Buy milk".to_string(),
                    content: "2 litres".to_string(),
                    column: "Todo".to_string(),
                },
                Card {
                    row_index: 1,
                    title: "Old".to_string(),
                    content: String::new(),
                    column: "Archive".to_string(),
                },
            ],
        };

        let text = render_board(&board);

        assert!(text.starts_with("## Todo\n[0] Buy milk\n    2 litres\n"));
        assert!(text.contains("## Done\n   (empty)\n"));
        assert!(!text.contains("Old"));
        assert!(text.contains("(1 card(s) belong to deleted columns)"));
    }
}
