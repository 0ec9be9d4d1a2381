//! Noughts and crosses with an exact minimax opponent.
//!
//! The [`session::GameSession`] is what a front end drives; [`game`] holds the
//! board, the rules and the searcher; [`arena`] plays scripted matches headless.

pub mod arena;
pub mod config;
pub mod game;
pub mod session;

pub use game::searcher::{SearchError, Searcher};
pub use game::{Board, BoardError, COMPUTER_MARK, Cell, HUMAN_MARK, Mark, rules};
pub use session::{GameSession, IllegalMove, Mode, MoveOutcome, SessionState};
