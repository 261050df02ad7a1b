//! Minimax and alpha-beta search.
//!
//! Both algorithms share one recursion shape: the searching player and the current ply depth
//! are passed down explicitly, and a [`Cutoff`] policy decides where the recursion stops and how
//! the stopping position is scored. [`Exhaustive`] searches to the end of the game,
//! [`DepthLimit`] stops after a fixed number of plies and falls back to the game's heuristic.

use crate::game::{Game, Symbol};

/// Counters collected while searching.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of positions examined below the root.
    pub nodes: u64,
}

/// Decides where a search stops and what the stopping position is worth.
pub trait Cutoff<G: Game> {
    /// Returns `true` if the search should not look past `state`, reached at ply `depth`.
    fn should_stop(&self, game: &G, state: &G::State, depth: usize) -> bool;

    /// Scores a stopping position from the perspective of `player`.
    fn score(&self, game: &G, state: &G::State, player: Symbol) -> f64;
}

/// Searches all the way to terminal positions.
#[derive(Debug, Default, Clone, Copy)]
pub struct Exhaustive;

impl<G: Game> Cutoff<G> for Exhaustive {
    fn should_stop(&self, game: &G, state: &G::State, _depth: usize) -> bool {
        game.terminal_test(state)
    }

    fn score(&self, game: &G, state: &G::State, player: Symbol) -> f64 {
        game.utility(state, player)
    }
}

/// Stops at terminal positions or once the given ply depth is reached. The children of the
/// root are at depth 1.
///
/// Won and lost positions score `±∞` so that they rank above every heuristic value; drawn
/// ones score their utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimit(pub usize);

impl<G: Game> Cutoff<G> for DepthLimit {
    fn should_stop(&self, game: &G, state: &G::State, depth: usize) -> bool {
        depth >= self.0 || game.terminal_test(state)
    }

    fn score(&self, game: &G, state: &G::State, player: Symbol) -> f64 {
        // a decided game must outrank any heuristic value
        if let Some(winner) = game.winner(state) {
            return if winner == player {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }
        if game.terminal_test(state) {
            return game.utility(state, player);
        }

        // the heuristic speaks for the side to move
        let value = game.evaluate(state);
        if game.to_move(state) == player {
            value
        } else {
            -value
        }
    }
}

/// Per-call search context.
struct Searcher<'a, G: Game, C: Cutoff<G>> {
    game: &'a G,
    cutoff: &'a C,
    player: Symbol,
    stats: &'a mut SearchStats,
}

impl<G: Game, C: Cutoff<G>> Searcher<'_, G, C> {
    fn max_value(&mut self, state: &G::State, depth: usize) -> f64 {
        self.stats.nodes += 1;
        if self.cutoff.should_stop(self.game, state, depth) {
            return self.cutoff.score(self.game, state, self.player);
        }

        let mut v = f64::NEG_INFINITY;
        for action in self.game.actions(state) {
            let child = self.game.result(state, action);
            v = v.max(self.min_value(&child, depth + 1));
        }
        v
    }

    fn min_value(&mut self, state: &G::State, depth: usize) -> f64 {
        self.stats.nodes += 1;
        if self.cutoff.should_stop(self.game, state, depth) {
            return self.cutoff.score(self.game, state, self.player);
        }

        let mut v = f64::INFINITY;
        for action in self.game.actions(state) {
            let child = self.game.result(state, action);
            v = v.min(self.max_value(&child, depth + 1));
        }
        v
    }

    fn ab_max_value(&mut self, state: &G::State, mut alpha: f64, beta: f64, depth: usize) -> f64 {
        self.stats.nodes += 1;
        if self.cutoff.should_stop(self.game, state, depth) {
            return self.cutoff.score(self.game, state, self.player);
        }

        let mut v = f64::NEG_INFINITY;
        for action in self.game.actions(state) {
            let child = self.game.result(state, action);
            v = v.max(self.ab_min_value(&child, alpha, beta, depth + 1));
            if v >= beta {
                return v;
            }
            alpha = alpha.max(v);
        }
        v
    }

    fn ab_min_value(&mut self, state: &G::State, alpha: f64, mut beta: f64, depth: usize) -> f64 {
        self.stats.nodes += 1;
        if self.cutoff.should_stop(self.game, state, depth) {
            return self.cutoff.score(self.game, state, self.player);
        }

        let mut v = f64::INFINITY;
        for action in self.game.actions(state) {
            let child = self.game.result(state, action);
            v = v.min(self.ab_max_value(&child, alpha, beta, depth + 1));
            if v <= alpha {
                return v;
            }
            beta = beta.min(v);
        }
        v
    }
}

/// Plain minimax under `cutoff`. Returns the first action with the highest value, together
/// with that value, or `None` if `state` has no actions.
pub fn minimax_search<G: Game, C: Cutoff<G>>(
    game: &G,
    state: &G::State,
    cutoff: &C,
    stats: &mut SearchStats,
) -> Option<(G::Action, f64)> {
    let mut searcher = Searcher {
        game,
        cutoff,
        player: game.to_move(state),
        stats,
    };

    let mut best: Option<(G::Action, f64)> = None;
    for action in game.actions(state) {
        let value = searcher.min_value(&game.result(state, action), 1);
        if best.as_ref().is_none_or(|(_, best_value)| value > *best_value) {
            best = Some((action.clone(), value));
        }
    }
    best
}

/// Minimax with alpha-beta pruning under `cutoff`.
///
/// The returned value always equals the minimax value; the action may differ from
/// [`minimax_search`] among equally good actions. The first action whose value beats the
/// running alpha is kept. If no action does (every line is lost at `-∞`), the first action is
/// returned.
pub fn alpha_beta_search<G: Game, C: Cutoff<G>>(
    game: &G,
    state: &G::State,
    cutoff: &C,
    stats: &mut SearchStats,
) -> Option<(G::Action, f64)> {
    let mut searcher = Searcher {
        game,
        cutoff,
        player: game.to_move(state),
        stats,
    };

    let mut alpha = f64::NEG_INFINITY;
    let beta = f64::INFINITY;
    let mut best: Option<(G::Action, f64)> = None;
    for action in game.actions(state) {
        let value = searcher.ab_min_value(&game.result(state, action), alpha, beta, 1);
        if value > alpha {
            alpha = value;
            best = Some((action.clone(), value));
        }
    }

    best.or_else(|| game.actions(state).first().map(|a| (a.clone(), alpha)))
}

/// Best action by minimax over the full game tree.
pub fn minimax<G: Game>(game: &G, state: &G::State) -> Option<G::Action> {
    minimax_search(game, state, &Exhaustive, &mut SearchStats::default()).map(|(a, _)| a)
}

/// Best action by alpha-beta over the full game tree.
pub fn alpha_beta<G: Game>(game: &G, state: &G::State) -> Option<G::Action> {
    alpha_beta_search(game, state, &Exhaustive, &mut SearchStats::default()).map(|(a, _)| a)
}

/// Best action by minimax, scoring positions `depth` plies down with the heuristic.
pub fn minmax_cutoff<G: Game>(game: &G, state: &G::State, depth: usize) -> Option<G::Action> {
    minimax_search(game, state, &DepthLimit(depth), &mut SearchStats::default()).map(|(a, _)| a)
}

/// Best action by alpha-beta, scoring positions `depth` plies down with the heuristic.
pub fn alpha_beta_cutoff<G: Game>(game: &G, state: &G::State, depth: usize) -> Option<G::Action> {
    alpha_beta_search(game, state, &DepthLimit(depth), &mut SearchStats::default())
        .map(|(a, _)| a)
}
