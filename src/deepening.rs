//! Time-bounded play by iterative deepening.

use crate::game::Game;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::search::{DepthLimit, Exhaustive, SearchStats, alpha_beta_search, minimax_search};
use crate::strategy::Strategy;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Which tree search a deepening driver repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
}

impl Algorithm {
    fn search<G: Game>(
        self,
        game: &G,
        state: &G::State,
        depth: Option<usize>,
        stats: &mut SearchStats,
    ) -> Option<(G::Action, f64)> {
        match (self, depth) {
            (Algorithm::Minimax, None) => minimax_search(game, state, &Exhaustive, stats),
            (Algorithm::AlphaBeta, None) => alpha_beta_search(game, state, &Exhaustive, stats),
            (Algorithm::Minimax, Some(d)) => minimax_search(game, state, &DepthLimit(d), stats),
            (Algorithm::AlphaBeta, Some(d)) => {
                alpha_beta_search(game, state, &DepthLimit(d), stats)
            }
        }
    }
}

/// What a deepening run settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepeningOutcome<A> {
    /// The chosen action.
    pub action: A,
    /// Depth of the last completed iteration. `None` when no cutoff search ran, either because
    /// the search was exhaustive or because a random opening move was played.
    pub depth: Option<usize>,
    /// Positions examined across all iterations.
    pub nodes: u64,
}

/// Picks an action for the side to move within `budget`.
///
/// Without a budget this is the exhaustive search. With one, positions offering more actions
/// than the game's opening threshold get a random move; everything else is searched at depth
/// 1, 2, ... until the deadline passes or an iteration at the game's maximum depth has run (the
/// bound is inclusive, so the deepest search is at `max_depth`). The clock is only
/// read between iterations, so the last iteration may overrun the budget, and the move
/// returned is always the one from the deepest completed iteration.
///
/// Returns `None` only if `state` has no actions.
pub fn iterative_deepening<G: Game, K: RandomGenerator>(
    game: &G,
    state: &G::State,
    algorithm: Algorithm,
    budget: Option<Duration>,
    random: &mut K,
) -> Option<DeepeningOutcome<G::Action>> {
    let mut stats = SearchStats::default();

    let Some(budget) = budget else {
        let (action, _) = algorithm.search(game, state, None, &mut stats)?;
        return Some(DeepeningOutcome {
            action,
            depth: None,
            nodes: stats.nodes,
        });
    };

    let actions = game.actions(state);
    if let Some(threshold) = game.opening_threshold() {
        if actions.len() > threshold {
            debug!(actions = actions.len(), threshold, "opening, playing at random");
            return random.choose(actions).map(|action| DeepeningOutcome {
                action: action.clone(),
                depth: None,
                nodes: 0,
            });
        }
    }

    let deadline = Instant::now() + budget;
    let mut depth = 0;
    let mut best = None;
    loop {
        depth += 1;
        best = algorithm.search(game, state, Some(depth), &mut stats).or(best);
        trace!(depth, nodes = stats.nodes, "finished iteration");

        if depth >= game.max_depth() || Instant::now() >= deadline {
            break;
        }
    }

    debug!(depth, nodes = stats.nodes, ?algorithm, "deepening stopped");
    best.map(|(action, _)| DeepeningOutcome {
        action,
        depth: Some(depth),
        nodes: stats.nodes,
    })
}

/// Plays by iterative-deepening minimax.
#[derive(Debug, Clone, Default)]
pub struct MinimaxPlayer<K: RandomGenerator = StandardRandomGenerator> {
    time_budget: Option<Duration>,
    random: K,
}

impl MinimaxPlayer {
    /// `None` searches every move to the end of the game.
    pub fn new(time_budget: Option<Duration>) -> Self {
        Self {
            time_budget,
            random: StandardRandomGenerator,
        }
    }
}

impl<K: RandomGenerator> MinimaxPlayer<K> {
    /// Replaces the generator used for opening moves.
    pub fn with_random_generator<R: RandomGenerator>(self, random: R) -> MinimaxPlayer<R> {
        MinimaxPlayer {
            time_budget: self.time_budget,
            random,
        }
    }
}

impl<G: Game, K: RandomGenerator> Strategy<G> for MinimaxPlayer<K> {
    fn choose(&mut self, game: &G, state: &G::State) -> Option<G::Action> {
        iterative_deepening(
            game,
            state,
            Algorithm::Minimax,
            self.time_budget,
            &mut self.random,
        )
        .map(|outcome| outcome.action)
    }
}

/// Plays by iterative-deepening alpha-beta.
#[derive(Debug, Clone, Default)]
pub struct AlphaBetaPlayer<K: RandomGenerator = StandardRandomGenerator> {
    time_budget: Option<Duration>,
    random: K,
}

impl AlphaBetaPlayer {
    /// `None` searches every move to the end of the game.
    pub fn new(time_budget: Option<Duration>) -> Self {
        Self {
            time_budget,
            random: StandardRandomGenerator,
        }
    }
}

impl<K: RandomGenerator> AlphaBetaPlayer<K> {
    /// Replaces the generator used for opening moves.
    pub fn with_random_generator<R: RandomGenerator>(self, random: R) -> AlphaBetaPlayer<R> {
        AlphaBetaPlayer {
            time_budget: self.time_budget,
            random,
        }
    }
}

impl<G: Game, K: RandomGenerator> Strategy<G> for AlphaBetaPlayer<K> {
    fn choose(&mut self, game: &G, state: &G::State) -> Option<G::Action> {
        iterative_deepening(
            game,
            state,
            Algorithm::AlphaBeta,
            self.time_budget,
            &mut self.random,
        )
        .map(|outcome| outcome.action)
    }
}

#[cfg(test)]
mod tests {
    use crate::deepening::{AlphaBetaPlayer, Algorithm, MinimaxPlayer, iterative_deepening};
    use crate::game::{Game, Symbol};
    use crate::games::k_in_row::{GameState, KInRow, Position};
    use crate::random::CustomNumberGenerator;
    use crate::search::{alpha_beta, minimax};
    use crate::strategy::Strategy;
    use std::time::Duration;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn one_winning_move(game: &KInRow) -> GameState {
        game.state_from_positions(
            Symbol::X,
            Some(p(3, 2)),
            &[p(1, 1), p(1, 2), p(3, 1)],
            &[p(2, 1), p(2, 2), p(3, 2)],
        )
    }

    #[test]
    fn no_budget_is_the_exact_search() {
        // arrange
        let game = KInRow::tic_tac_toe();
        let state = game.state_from_positions(Symbol::X, Some(p(1, 1)), &[p(2, 2)], &[p(1, 1)]);
        let mut random = CustomNumberGenerator::default();

        // act
        let by_minimax =
            iterative_deepening(&game, &state, Algorithm::Minimax, None, &mut random).unwrap();
        let by_alpha_beta =
            iterative_deepening(&game, &state, Algorithm::AlphaBeta, None, &mut random).unwrap();

        // assert
        assert_eq!(Some(by_minimax.action), minimax(&game, &state));
        assert_eq!(Some(by_alpha_beta.action), alpha_beta(&game, &state));
        assert_eq!(by_minimax.depth, None);
        assert!(by_alpha_beta.nodes > 0);
    }

    #[test]
    fn crowded_openings_are_played_at_random() {
        let game = KInRow::tic_tac_toe();
        let state = game.initial_state();
        let mut random = CustomNumberGenerator::new(5);

        let outcome = iterative_deepening(
            &game,
            &state,
            Algorithm::AlphaBeta,
            Some(Duration::from_secs(1)),
            &mut random,
        )
        .unwrap();

        assert!(state.remaining_moves().contains(&outcome.action));
        assert_eq!(outcome.depth, None);
        assert_eq!(outcome.nodes, 0);
    }

    #[test]
    fn deepening_reaches_full_depth_and_wins() {
        let game = KInRow::tic_tac_toe();
        let state = one_winning_move(&game);
        let mut random = CustomNumberGenerator::default();

        let outcome = iterative_deepening(
            &game,
            &state,
            Algorithm::Minimax,
            Some(Duration::from_secs(10)),
            &mut random,
        )
        .unwrap();

        assert_eq!(outcome.action, p(1, 3));
        assert_eq!(outcome.depth, Some(game.max_depth()));
    }

    #[test]
    fn zero_budget_still_completes_one_iteration() {
        let game = KInRow::tic_tac_toe();
        let state = one_winning_move(&game);
        let mut random = CustomNumberGenerator::default();

        let outcome = iterative_deepening(
            &game,
            &state,
            Algorithm::AlphaBeta,
            Some(Duration::ZERO),
            &mut random,
        )
        .unwrap();

        // winning at depth 1 is visible without the heuristic
        assert_eq!(outcome.action, p(1, 3));
        assert_eq!(outcome.depth, Some(1));
        assert_eq!(outcome.nodes, 3);
    }

    #[test]
    fn finished_game_has_no_move() {
        let game = KInRow::new(1, 1);
        let state = game.result(&game.initial_state(), &p(1, 1));
        let mut random = CustomNumberGenerator::default();

        for budget in [None, Some(Duration::from_secs(1))] {
            assert_eq!(
                iterative_deepening(&game, &state, Algorithm::Minimax, budget, &mut random),
                None
            );
        }
    }

    #[test]
    fn players_pick_the_winning_move() {
        let game = KInRow::tic_tac_toe();
        let state = one_winning_move(&game);
        let mut minimax_player = MinimaxPlayer::new(Some(Duration::from_secs(1)))
            .with_random_generator(CustomNumberGenerator::default());
        let mut alpha_beta_player = AlphaBetaPlayer::new(None);

        assert_eq!(minimax_player.choose(&game, &state), Some(p(1, 3)));
        assert_eq!(alpha_beta_player.choose(&game, &state), Some(p(1, 3)));
    }
}
