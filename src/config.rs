use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::searcher::{SearchError, Searcher};
use crate::game::{Board, HUMAN_MARK, Mark, rules};
use crate::session::Mode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// How a scripted player picks its cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Random,
    Perfect,
}

impl Strategy {
    pub fn pick<R: Rng + ?Sized>(
        self,
        board: &Board,
        mark: Mark,
        rng: &mut R,
    ) -> Result<(u8, u8), SearchError> {
        match self {
            Strategy::Random => rules::empty_cells(board)
                .as_slice()
                .choose(rng)
                .copied()
                .ok_or(SearchError::TerminalPosition),
            Strategy::Perfect => Searcher::best_move(board, mark),
        }
    }
}

/// Settings for a headless run of the arena.
///
/// In [`Mode::PvComputer`] the built-in searcher always plays O, so `o` must
/// be left out; in [`Mode::Pvp`] both sides are scripted.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub games: usize,
    pub seed: u64,
    pub mode: Mode,
    pub x: Strategy,
    pub o: Option<Strategy>,
    pub auto_restart: bool,
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 100,
            seed: 0,
            mode: Mode::PvComputer,
            x: Strategy::Random,
            o: None,
            auto_restart: false,
            verbose: false,
        }
    }
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games == 0 {
            return Err(ConfigError::Invalid {
                message: "games must be at least 1".to_string(),
            });
        }
        match (self.mode, self.o) {
            (Mode::PvComputer, Some(_)) => Err(ConfigError::Invalid {
                message: "`o` is played by the computer in pv_computer mode".to_string(),
            }),
            (Mode::Pvp, None) => Err(ConfigError::Invalid {
                message: "pvp mode needs a strategy for `o`".to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// The scripted strategy for `mark`, or `None` when the computer plays it.
    pub fn strategy_for(&self, mark: Mark) -> Option<Strategy> {
        if mark == HUMAN_MARK {
            Some(self.x)
        } else {
            self.o
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        assert_eq!(MatchConfig::from_json("{}").unwrap(), MatchConfig::default());
    }

    #[test]
    fn parses_pvp_config() {
        let config = MatchConfig::from_json(
            r#"{ "games": 8, "seed": 42, "mode": "pvp", "x": "perfect", "o": "random" }"#,
        )
        .unwrap();
        assert_eq!(config.games, 8);
        assert_eq!(config.mode, Mode::Pvp);
        assert_eq!(config.strategy_for(Mark::X), Some(Strategy::Perfect));
        assert_eq!(config.strategy_for(Mark::O), Some(Strategy::Random));
    }

    #[test]
    fn computer_side_is_unscripted_by_default() {
        let config = MatchConfig::default();
        assert_eq!(config.strategy_for(HUMAN_MARK), Some(Strategy::Random));
        assert_eq!(config.strategy_for(crate::game::COMPUTER_MARK), None);
    }

    #[test]
    fn rejects_inconsistent_modes() {
        assert!(matches!(
            MatchConfig::from_json(r#"{ "o": "perfect" }"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            MatchConfig::from_json(r#"{ "mode": "pvp" }"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            MatchConfig::from_json(r#"{ "games": 0 }"#),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            MatchConfig::from_json(r#"{ "difficulty": "hard" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MatchConfig::from_path(Path::new("/nonexistent/tris.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn random_strategy_only_picks_empty_cells() {
        let board: Board = "XOX/O.X/OX.".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let (row, col) = Strategy::Random.pick(&board, Mark::O, &mut rng).unwrap();
            assert!(board.get(row, col).unwrap().is_empty());
        }
    }

    #[test]
    fn strategies_fail_on_full_board() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            Strategy::Random.pick(&board, Mark::X, &mut rng),
            Err(SearchError::TerminalPosition)
        );
        assert_eq!(
            Strategy::Perfect.pick(&board, Mark::X, &mut rng),
            Err(SearchError::TerminalPosition)
        );
    }
}
