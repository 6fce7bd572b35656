use crate::domain::entities::board::Card;

/// Field values for a card about to be written to the cards tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub content: String,
    pub column: String,
}

impl CardDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            column: column.into(),
        }
    }

    /// Cells in the order of the cards tab header.
    pub fn into_row(self) -> Vec<String> {
        vec![self.title, self.content, self.column]
    }
}

impl From<&Card> for CardDraft {
    fn from(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            content: card.content.clone(),
            column: card.column.clone(),
        }
    }
}
