pub const COLUMNS_TAB: &str = "Colunas";
pub const CARDS_TAB: &str = "Cards";

pub const LIST_HEADER: &str = "Lista";
pub const TITLE_HEADER: &str = "Titulo";
pub const CONTENT_HEADER: &str = "Conteudo";
pub const COLUMN_HEADER: &str = "Coluna";

pub static COLUMNS_HEADERS: [&str; 1] = [LIST_HEADER];
pub static CARDS_HEADERS: [&str; 3] = [TITLE_HEADER, CONTENT_HEADER, COLUMN_HEADER];

/// 1-based cell positions inside a card row.
pub const TITLE_COL: usize = 1;
pub const CONTENT_COL: usize = 2;
pub const COLUMN_COL: usize = 3;

/// Rows above the first data row of every tab.
pub const HEADER_ROWS: usize = 1;

/// Translates a 0-based position in a loaded record list into the 1-based
/// sheet row that holds it.
pub fn sheet_row(row_index: usize) -> usize {
    row_index + HEADER_ROWS + 1
}

/// Names of the two tabs a board lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub columns_tab: String,
    pub cards_tab: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            columns_tab: COLUMNS_TAB.to_string(),
            cards_tab: CARDS_TAB.to_string(),
        }
    }
}

impl SheetLayout {
    pub fn new(columns_tab: impl Into<String>, cards_tab: impl Into<String>) -> Self {
        Self {
            columns_tab: columns_tab.into(),
            cards_tab: cards_tab.into(),
        }
    }

    /// Expected header row for `tab`, if it is one of the board tabs.
    pub fn headers_for(&self, tab: &str) -> Option<&'static [&'static str]> {
        if tab == self.columns_tab {
            Some(&COLUMNS_HEADERS[..])
        } else if tab == self.cards_tab {
            Some(&CARDS_HEADERS[..])
        } else {
            None
        }
    }

    pub fn tabs(&self) -> [(&str, &'static [&'static str]); 2] {
        [
            (self.columns_tab.as_str(), &COLUMNS_HEADERS[..]),
            (self.cards_tab.as_str(), &CARDS_HEADERS[..]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_row_skips_header_and_zero_index() {
        assert_eq!(sheet_row(0), 2);
        assert_eq!(sheet_row(5), 7);
    }

    #[test]
    fn headers_for_matches_configured_tabs() {
        let layout = SheetLayout::new("Lanes", "Items");

        assert_eq!(layout.headers_for("Lanes"), Some(&COLUMNS_HEADERS[..]));
        assert_eq!(layout.headers_for("Items"), Some(&CARDS_HEADERS[..]));
        assert_eq!(layout.headers_for("Colunas"), None);
    }
}
