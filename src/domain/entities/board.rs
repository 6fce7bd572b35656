use crate::domain::entities::layout::sheet_row;

/// A card as it was read from the cards tab.
///
/// `row_index` is the 0-based position of the card in the loaded list; it is
/// only meaningful until the next mutation of the cards tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub row_index: usize,
    pub title: String,
    pub content: String,
    pub column: String,
}

impl Card {
    pub fn sheet_row(&self) -> usize {
        sheet_row(self.row_index)
    }

    /// Text shown under the title on the board, cut at 100 characters.
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 100;
        if self.content.chars().count() > PREVIEW_CHARS {
            let head: String = self.content.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            self.content.clone()
        }
    }
}

/// One column of the board with the cards assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane<'a> {
    pub name: &'a str,
    pub cards: Vec<&'a Card>,
}

/// Snapshot of both tabs taken by a single load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub column_names: Vec<String>,
    pub cards: Vec<Card>,
}

impl Board {
    pub fn is_empty(&self) -> bool {
        self.column_names.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|column| column == name)
    }

    pub fn card(&self, row_index: usize) -> Option<&Card> {
        self.cards.get(row_index)
    }

    pub fn cards_in<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Card> + 'a {
        self.cards.iter().filter(move |card| card.column == column)
    }

    /// Columns in display order, each with its cards in sheet order.
    pub fn lanes(&self) -> Vec<Lane<'_>> {
        self.column_names
            .iter()
            .map(|name| Lane {
                name: name.as_str(),
                cards: self.cards_in(name).collect(),
            })
            .collect()
    }

    /// Cards whose column no longer exists. They stay in storage but are not
    /// part of any lane.
    pub fn orphaned_cards(&self) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|card| !self.has_column(&card.column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(row_index: usize, title: &str, column: &str) -> Card {
        Card {
            row_index,
            title: title.to_string(),
            content: String::new(),
            column: column.to_string(),
        }
    }

    #[test]
    fn lanes_follow_column_order_and_skip_orphans() {
        let board = Board {
            column_names: vec!["Done".to_string(), "Todo".to_string()],
            cards: vec![
                card(0, "a", "Todo"),
                card(1, "b", "Gone"),
                card(2, "c", "Done"),
                card(3, "d", "Todo"),
            ],
        };

        let lanes = board.lanes();
        let names: Vec<&str> = lanes.iter().map(|lane| lane.name).collect();
        assert_eq!(names, vec!["Done", "Todo"]);

        let todo: Vec<&str> = lanes[1].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(todo, vec!["a", "d"]);

        let orphans: Vec<usize> = board.orphaned_cards().iter().map(|c| c.row_index).collect();
        assert_eq!(orphans, vec![1]);
    }

    #[test]
    fn preview_truncates_long_content_on_char_boundary() {
        let mut long = card(0, "t", "x");
        long.content = "é".repeat(120);

        let preview = long.preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 103);

        let mut short = card(0, "t", "x");
        short.content = "short".to_string();
        assert_eq!(short.preview(), "short");
    }
}
