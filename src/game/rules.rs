//! Stateless rule queries over a [`Board`].

use arrayvec::ArrayVec;

use super::{Board, Mark};

/// The eight winning lines: rows, then columns, then both diagonals.
pub const LINES: [[(u8, u8); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOutcome {
    InProgress,
    Win(Mark),
    Draw,
}

/// Returns the mark holding a complete line.
///
/// Two different marks can never both hold a line under alternating play; on
/// such a hand-built board the first line in [`LINES`] order wins.
pub fn winner(board: &Board) -> Option<Mark> {
    let squares = board.squares();
    LINES.iter().find_map(|&line| {
        let [a, b, c] = line.map(|(row, col)| squares[row as usize][col as usize]);
        a.mark().filter(|_| a == b && b == c)
    })
}

pub fn is_draw(board: &Board) -> bool {
    board.is_full() && winner(board).is_none()
}

/// Empty cells in row-major order. The searcher relies on this order for
/// tie-breaking.
pub fn empty_cells(board: &Board) -> ArrayVec<(u8, u8), 9> {
    let mut cells = ArrayVec::new();
    for (row, squares) in board.squares().iter().enumerate() {
        for (col, cell) in squares.iter().enumerate() {
            if cell.is_empty() {
                cells.push((row as u8, col as u8));
            }
        }
    }
    cells
}

pub fn outcome(board: &Board) -> GameOutcome {
    match winner(board) {
        Some(mark) => GameOutcome::Win(mark),
        None if board.is_full() => GameOutcome::Draw,
        None => GameOutcome::InProgress,
    }
}
