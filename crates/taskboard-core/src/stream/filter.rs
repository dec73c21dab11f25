// ── Board filter predicates ──
//
// Dashboard and closed-boards views filter snapshots without re-querying.

use crate::model::Board;

/// Filter predicate for board collections.
pub enum BoardFilter {
    All,
    /// Open boards (the workspace view).
    Active,
    /// Starred boards that are still open.
    Starred,
    Closed,
    Custom(Box<dyn Fn(&Board) -> bool + Send + Sync>),
}

impl BoardFilter {
    pub fn matches(&self, board: &Board) -> bool {
        match self {
            Self::All => true,
            Self::Active => !board.closed,
            Self::Starred => board.starred && !board.closed,
            Self::Closed => board.closed,
            Self::Custom(f) => f(board),
        }
    }
}

impl std::fmt::Debug for BoardFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Active => f.write_str("Active"),
            Self::Starred => f.write_str("Starred"),
            Self::Closed => f.write_str("Closed"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_moves_board_between_views() {
        let mut board = Board::with_id("1", "Work");
        assert!(BoardFilter::Active.matches(&board));
        assert!(!BoardFilter::Closed.matches(&board));

        board.closed = true;
        assert!(!BoardFilter::Active.matches(&board));
        assert!(BoardFilter::Closed.matches(&board));
    }

    #[test]
    fn closed_starred_board_leaves_starred_view() {
        let mut board = Board::with_id("1", "Work");
        board.starred = true;
        assert!(BoardFilter::Starred.matches(&board));
        board.closed = true;
        assert!(!BoardFilter::Starred.matches(&board));
    }

    #[test]
    fn custom_predicate() {
        let filter = BoardFilter::Custom(Box::new(|b| b.title.starts_with('W')));
        assert!(filter.matches(&Board::with_id("1", "Work")));
        assert!(!filter.matches(&Board::with_id("2", "Home")));
    }
}
