//! Headless match runner: plays many independent sessions in parallel.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info_span};

use crate::config::{ConfigError, MatchConfig};
use crate::game::Mark;
use crate::game::searcher::SearchError;
use crate::session::{GameSession, IllegalMove, MoveOutcome};

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scripted player found no move: {0}")]
    Search(#[from] SearchError),

    #[error("scripted player made an illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    #[error("game {index}: {mark} is played by the computer but it was asked to move")]
    UnscriptedTurn { index: usize, mark: Mark },
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize)]
pub struct Tally {
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

impl Tally {
    pub fn record(mut self, outcome: MoveOutcome) -> Self {
        match outcome {
            MoveOutcome::Win(Mark::X) => self.x_wins += 1,
            MoveOutcome::Win(Mark::O) => self.o_wins += 1,
            MoveOutcome::Draw => self.draws += 1,
            MoveOutcome::Continued => {}
        }
        self
    }

    pub fn games(&self) -> usize {
        self.x_wins + self.o_wins + self.draws
    }
}

pub fn run(config: &MatchConfig) -> Result<Tally, ArenaError> {
    config.validate()?;

    let outcomes = (0..config.games)
        .into_par_iter()
        .map(|index| play_game(config, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(outcomes.into_iter().fold(Tally::default(), Tally::record))
}

/// Plays one game to its end. Game `index` draws its randomness from
/// `seed + index`, so a run is reproducible regardless of scheduling.
pub fn play_game(config: &MatchConfig, index: usize) -> Result<MoveOutcome, ArenaError> {
    let _span = info_span!("game", index).entered();
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(index as u64));
    let mut session = GameSession::new(config.mode).with_auto_restart(config.auto_restart);

    loop {
        let mark = session.current_turn();
        let strategy = config
            .strategy_for(mark)
            .ok_or(ArenaError::UnscriptedTurn { index, mark })?;
        let (row, col) = strategy.pick(session.board(), mark, &mut rng)?;

        let outcome = session.attempt_move(row, col)?;
        if outcome.is_terminal() {
            debug!("outcome" = %outcome, "board" = %session.board(), "game_finished");
            return Ok(outcome);
        }
    }
}
