//! The mutable game loop a presentation layer drives.
//!
//! A [`GameSession`] owns the authoritative [`Board`], tracks whose turn it is
//! and, in [`Mode::PvComputer`], answers every human placement with the
//! searcher's reply before returning.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::game::searcher::Searcher;
use crate::game::{Board, BoardError, COMPUTER_MARK, Cell, Mark, rules};

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Pvp,
    #[default]
    PvComputer,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Continued,
    Win(Mark),
    Draw,
}

impl MoveOutcome {
    pub fn is_terminal(self) -> bool {
        self != MoveOutcome::Continued
    }
}

impl std::fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveOutcome::Continued => f.write_str("Game continues."),
            MoveOutcome::Win(mark) => write!(f, "Player {mark} wins!"),
            MoveOutcome::Draw => f.write_str("It's a draw!"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    AwaitingMove,
    Terminal,
}

/// A rejected placement. The session is left exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("the game is over; acknowledge the outcome before moving again")]
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    turn: Mark,
    mode: Mode,
    state: SessionState,
    auto_restart: bool,
    last_computer_move: Option<(u8, u8)>,
    started_at: Instant,
    finished_at: Option<Instant>,
}

impl GameSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            board: Board::new(),
            turn: Mark::X,
            mode,
            state: SessionState::AwaitingMove,
            auto_restart: false,
            last_computer_move: None,
            started_at: Instant::now(),
            finished_at: None,
        }
    }

    /// When enabled, a terminal outcome is still reported but the board is
    /// cleared straight away instead of waiting for [`Self::acknowledge_outcome`].
    pub fn with_auto_restart(mut self, enabled: bool) -> Self {
        self.auto_restart = enabled;
        self
    }

    /// Switches to `mode` and starts over.
    pub fn new_game(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.turn = Mark::X;
        self.state = SessionState::AwaitingMove;
        self.last_computer_move = None;
        self.started_at = Instant::now();
        self.finished_at = None;
    }

    /// Clears a finished game. Returns `false` (and does nothing) while a game
    /// is still being played.
    pub fn acknowledge_outcome(&mut self) -> bool {
        if self.state != SessionState::Terminal {
            return false;
        }
        self.reset();
        true
    }

    /// Places the current player's mark at `(row, col)`.
    ///
    /// In [`Mode::PvComputer`] the computer's reply is played before this
    /// returns, and the outcome reported is the one after that reply.
    pub fn attempt_move(&mut self, row: u8, col: u8) -> Result<MoveOutcome, IllegalMove> {
        if self.state == SessionState::Terminal {
            warn!("row" = row, "col" = col, "move_rejected_game_over");
            return Err(IllegalMove::GameOver);
        }

        let mut outcome = self.apply(row, col).inspect_err(|err| {
            warn!("row" = row, "col" = col, "error" = %err, "move_rejected");
        })?;
        self.last_computer_move = None;

        if outcome == MoveOutcome::Continued
            && self.mode == Mode::PvComputer
            && self.turn == COMPUTER_MARK
        {
            outcome = self.computer_move()?;
        }

        if outcome.is_terminal() && self.auto_restart {
            self.reset();
        }
        Ok(outcome)
    }

    fn computer_move(&mut self) -> Result<MoveOutcome, IllegalMove> {
        let (row, col) =
            Searcher::best_move(&self.board, self.turn).map_err(|_| IllegalMove::GameOver)?;
        let outcome = self.apply(row, col)?;
        self.last_computer_move = Some((row, col));
        Ok(outcome)
    }

    fn apply(&mut self, row: u8, col: u8) -> Result<MoveOutcome, IllegalMove> {
        let mark = self.turn;
        self.board.place(row, col, mark)?;
        debug!("mark" = %mark, "row" = row, "col" = col, "move_applied");

        let outcome = match rules::outcome(&self.board) {
            rules::GameOutcome::InProgress => {
                self.turn = !mark;
                return Ok(MoveOutcome::Continued);
            }
            rules::GameOutcome::Win(winner) => MoveOutcome::Win(winner),
            rules::GameOutcome::Draw => MoveOutcome::Draw,
        };

        self.state = SessionState::Terminal;
        self.finished_at = Some(Instant::now());
        info!("outcome" = %outcome, "elapsed" = ?self.elapsed(), "game_over");
        Ok(outcome)
    }

    pub fn cell_at(&self, row: u8, col: u8) -> Result<Cell, BoardError> {
        self.board.get(row, col)
    }

    pub fn current_turn(&self) -> Mark {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The cell the computer answered with during the last accepted move.
    pub fn last_computer_move(&self) -> Option<(u8, u8)> {
        self.last_computer_move
    }

    /// Time since the current game started, frozen once it ends.
    pub fn elapsed(&self) -> Duration {
        self.finished_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.started_at)
    }
}
