use std::ops::Not;
use std::str::FromStr;

use thiserror::Error;

pub mod rules;
pub mod searcher;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Mark {
    #[default]
    X,
    O,
}

pub const HUMAN_MARK: Mark = Mark::X;
pub const COMPUTER_MARK: Mark = Mark::O;

impl Not for Mark {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::X => f.pad("X"),
            Mark::O => f.pad("O"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mark() {
            Some(mark) => std::fmt::Display::fmt(&mark, f),
            None => f.pad("."),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the 3x3 board")]
    OutOfBounds { row: u8, col: u8 },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: u8, col: u8 },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("invalid cell character {0:?} (expected 'X', 'O' or '.')")]
    InvalidCell(char),

    #[error("expected 9 cells, got {0}")]
    WrongLength(usize),
}

/// A 3x3 grid addressed by `(row, col)`, both in `0..3`.
///
/// Boards are `Copy`, so handing one to the searcher always hands over an
/// independent scratch copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Board {
    squares: [[Cell; 3]; 3],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_bounds(row: u8, col: u8) -> Result<(), BoardError> {
        if row < 3 && col < 3 {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds { row, col })
        }
    }

    pub fn get(&self, row: u8, col: u8) -> Result<Cell, BoardError> {
        Self::check_bounds(row, col)?;
        Ok(self.squares[row as usize][col as usize])
    }

    /// Puts `mark` on an empty cell. Whose turn it is is the caller's concern.
    pub fn place(&mut self, row: u8, col: u8, mark: Mark) -> Result<(), BoardError> {
        if !self.get(row, col)?.is_empty() {
            return Err(BoardError::CellOccupied { row, col });
        }
        self.squares[row as usize][col as usize] = mark.into();
        Ok(())
    }

    #[must_use = "the original board is left untouched"]
    pub fn with_move(&self, row: u8, col: u8, mark: Mark) -> Result<Self, BoardError> {
        let mut new_self = *self;
        new_self.place(row, col, mark)?;
        Ok(new_self)
    }

    // Unchecked write for scratch copies whose coordinates come from `rules::empty_cells`.
    pub(crate) fn set(&mut self, row: u8, col: u8, cell: Cell) {
        self.squares[row as usize][col as usize] = cell;
    }

    pub fn is_full(&self) -> bool {
        self.squares
            .iter()
            .all(|row| row.iter().all(|&cell| !cell.is_empty()))
    }

    pub fn squares(&self) -> &[[Cell; 3]; 3] {
        &self.squares
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.squares.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

/// Parses nine cells in row-major order. Whitespace and `/` are ignored, so
/// `"XO./.X./..O"` and the `Display` output both round-trip.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .map(|c| match c {
                'X' | 'x' => Ok(Cell::X),
                'O' | 'o' => Ok(Cell::O),
                '.' => Ok(Cell::Empty),
                other => Err(ParseBoardError::InvalidCell(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if cells.len() != 9 {
            return Err(ParseBoardError::WrongLength(cells.len()));
        }

        let mut board = Board::default();
        for (index, cell) in cells.into_iter().enumerate() {
            board.squares[index / 3][index % 3] = cell;
        }
        Ok(board)
    }
}
