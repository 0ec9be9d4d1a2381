use std::sync::OnceLock;

use arrayvec::ArrayVec;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

use super::{Board, Mark, rules};

pub const WIN_SCORE: i32 = 10;
pub const LOSS_SCORE: i32 = -10;
pub const DRAW_SCORE: i32 = 0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("no move to search for: the position is already terminal")]
    TerminalPosition,
}

pub struct Searcher {
    maximizer: Mark,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct TTableKey {
    board: Board,
    to_move: Mark,
    maximizer: Mark,
}

// Values are exact and independent of depth, so entries never go stale.
static TRANSPOSITION_TABLE: OnceLock<DashMap<TTableKey, i32>> = OnceLock::new();

impl Searcher {
    /// Picks the cell that maximizes `mark`'s guaranteed outcome.
    ///
    /// Ties go to the first cell in row-major order. The caller's board is
    /// never touched; applying the returned cell is up to the caller.
    pub fn best_move(board: &Board, mark: Mark) -> Result<(u8, u8), SearchError> {
        let mut best: Option<((u8, u8), i32)> = None;
        for (cell, value) in Self::score_moves(board, mark)? {
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((cell, value));
            }
        }

        let (cell, value) = best.ok_or(SearchError::TerminalPosition)?;
        debug!("cell" = ?cell, "value" = value, "mark" = %mark, "computer_move_chosen");
        Ok(cell)
    }

    /// Every legal cell for `mark` together with its exact minimax value, in
    /// row-major order.
    pub fn score_moves(
        board: &Board,
        mark: Mark,
    ) -> Result<ArrayVec<((u8, u8), i32), 9>, SearchError> {
        if rules::winner(board).is_some() || board.is_full() {
            return Err(SearchError::TerminalPosition);
        }

        let searcher = Self { maximizer: mark };
        Ok(rules::empty_cells(board)
            .into_iter()
            .map(|(row, col)| {
                let mut child = *board;
                child.set(row, col, mark.into());
                let value = searcher.branch(&child, !mark);
                debug!("cell" = ?(row, col), "value" = value, "computer_move_opportunity");
                ((row, col), value)
            })
            .collect())
    }

    /// Value of `board` with `to_move` on turn, scored from `maximizer`'s side.
    pub fn evaluate(board: &Board, to_move: Mark, maximizer: Mark) -> i32 {
        Self { maximizer }.branch(board, to_move)
    }

    fn branch(&self, node: &Board, to_move: Mark) -> i32 {
        if let Some(winner) = rules::winner(node) {
            return if winner == self.maximizer {
                WIN_SCORE
            } else {
                LOSS_SCORE
            };
        }
        if node.is_full() {
            return DRAW_SCORE;
        }

        let table = TRANSPOSITION_TABLE.get_or_init(DashMap::new);
        let key = TTableKey {
            board: *node,
            to_move,
            maximizer: self.maximizer,
        };
        let cached = table.get(&key).map(|entry| *entry.value());
        if let Some(value) = cached {
            return value;
        }

        let maximizing = to_move == self.maximizer;
        let mut best_eval = if maximizing { i32::MIN } else { i32::MAX };
        for (row, col) in rules::empty_cells(node) {
            let mut child = *node;
            child.set(row, col, to_move.into());
            let eval = self.branch(&child, !to_move);
            best_eval = if maximizing {
                best_eval.max(eval)
            } else {
                best_eval.min(eval)
            };
        }

        table.insert(key, best_eval);
        best_eval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn takes_the_win_before_blocking() {
        let b = board("OO./XX./...");
        assert_eq!(Searcher::best_move(&b, Mark::O), Ok((0, 2)));
    }

    #[test]
    fn blocks_the_open_row() {
        let b = board("XX./.O./...");
        assert_eq!(Searcher::best_move(&b, Mark::O), Ok((0, 2)));
    }

    #[test]
    fn blocks_the_open_column() {
        let b = board("X../XO./...");
        assert_eq!(Searcher::best_move(&b, Mark::O), Ok((2, 0)));
    }

    #[test]
    fn search_does_not_touch_the_board() {
        let b = board("X../.O./..X");
        let copy = b;
        Searcher::best_move(&b, Mark::O).unwrap();
        assert_eq!(b, copy);
    }

    #[test]
    fn ties_go_to_the_first_cell_in_scan_order() {
        // Every opening is a draw under optimal play, so (0, 0) is picked.
        assert_eq!(Searcher::best_move(&Board::new(), Mark::X), Ok((0, 0)));
        // Against a corner opening only the centre holds.
        let b = board("X../.../...");
        assert_eq!(Searcher::best_move(&b, Mark::O), Ok((1, 1)));
    }

    #[test]
    fn scores_are_flat_not_depth_adjusted() {
        // O wins at once with (0, 2); the (1, 1) fork wins a move later but scores the same.
        let b = board("OO./X../..X");
        let scores = Searcher::score_moves(&b, Mark::O).unwrap();
        assert!(scores.contains(&((0, 2), WIN_SCORE)));
        assert!(scores.contains(&((1, 1), WIN_SCORE)));
        assert_eq!(Searcher::best_move(&b, Mark::O), Ok((0, 2)));
    }

    #[test]
    fn terminal_positions_are_rejected() {
        assert_eq!(
            Searcher::best_move(&board("OOO/XX./X.."), Mark::X),
            Err(SearchError::TerminalPosition)
        );
        assert_eq!(
            Searcher::best_move(&board("XOX/XOO/OXX"), Mark::O),
            Err(SearchError::TerminalPosition)
        );
    }

    #[test]
    fn evaluate_is_symmetric_between_sides() {
        let b = board("X../.O./..X");
        assert_eq!(
            Searcher::evaluate(&b, Mark::O, Mark::O),
            -Searcher::evaluate(&b, Mark::O, Mark::X)
        );
        assert_eq!(Searcher::evaluate(&Board::new(), Mark::X, Mark::X), DRAW_SCORE);
    }
}
