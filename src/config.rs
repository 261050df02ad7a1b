//! Configuration for games and players.
//!
//! Both structs deserialize with `serde`, filling missing fields from their defaults, so a
//! front-end can keep them in whatever format it already uses.

use crate::error::ConfigError;
use crate::games::k_in_row::KInRow;
use crate::random::DEFAULT_SEED;
use serde::Deserialize;
use std::time::Duration;

/// Default exploration constant for UCT.
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Default wall-clock budget for one Monte Carlo search, in seconds.
pub const DEFAULT_MCTS_TIME_BUDGET_SECS: f64 = 4.0;

/// Converts a budget in seconds. Zero, negative and non-finite values mean "no limit".
pub fn time_budget(secs: f64) -> Option<Duration> {
    if secs > 0.0 && secs.is_finite() {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}

/// Board shape and per-move thinking time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board.
    pub size: usize,

    /// Length of a winning run. Zero or negative means a full line (`k = size`).
    pub k: i32,

    /// Seconds per move for the iterative-deepening players. Non-positive disables iterative
    /// deepening in favour of a full search.
    pub time_budget_secs: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 3,
            k: 3,
            time_budget_secs: -1.0,
        }
    }
}

impl GameConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_k(mut self, k: i32) -> Self {
        self.k = k;
        self
    }

    pub fn with_time_budget_secs(mut self, secs: f64) -> Self {
        self.time_budget_secs = secs;
        self
    }

    /// The per-move budget, or `None` when unbounded.
    pub fn time_budget(&self) -> Option<Duration> {
        time_budget(self.time_budget_secs)
    }

    /// Validates the board and builds the rules.
    pub fn build(&self) -> Result<KInRow, ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::EmptyBoard);
        }

        let game = KInRow::new(self.size, self.k);
        if game.k() > self.size {
            return Err(ConfigError::RunTooLong {
                k: game.k(),
                size: self.size,
            });
        }
        Ok(game)
    }
}

/// Settings for Monte Carlo tree search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Exploration constant `c` of the UCT formula. `0` gives pure exploitation.
    pub exploration: f64,

    /// Wall-clock budget per search in seconds. Non-positive means no time limit.
    pub time_budget_secs: f64,

    /// Optional cap on the number of select/expand/simulate/backpropagate cycles.
    pub max_iterations: Option<u32>,

    /// Seed for reproducible searches. `None` uses thread-local randomness.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
            time_budget_secs: DEFAULT_MCTS_TIME_BUDGET_SECS,
            max_iterations: None,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Fixed cycle count and seed, no clock: the same position always yields the same move.
    pub fn for_testing() -> Self {
        Self {
            exploration: DEFAULT_EXPLORATION,
            time_budget_secs: -1.0,
            max_iterations: Some(500),
            seed: Some(DEFAULT_SEED),
        }
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_time_budget_secs(mut self, secs: f64) -> Self {
        self.time_budget_secs = secs;
        self
    }

    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The per-search budget, or `None` when unbounded.
    pub fn time_budget(&self) -> Option<Duration> {
        time_budget(self.time_budget_secs)
    }
}
