use crate::game::{Game, Symbol};

/// Score delta used for decided playouts and proven wins.
pub const SENTINEL: f64 = i64::MAX as f64;

/// Represents a single node in the Monte Carlo search tree.
///
/// `accumulated_score` is kept from the point of view of the player who made the move into
/// this node, so a parent always prefers the child with the highest average.
#[derive(Debug, Clone)]
pub struct MctsNode<G: Game> {
    /// The game state that this node represents.
    pub state: G::State,
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<G::Action>,
    /// The player whose turn it is in this node's game state.
    pub to_move: Symbol,
    /// The number of times this node has been visited during the search.
    pub visit_count: u32,
    /// Sum of the score deltas propagated through this node.
    pub accumulated_score: f64,
}

impl<G: Game> MctsNode<G> {
    pub fn new(game: &G, state: G::State, prev_move: Option<G::Action>) -> Self {
        MctsNode {
            to_move: game.to_move(&state),
            state,
            prev_move,
            visit_count: 0,
            accumulated_score: 0.0,
        }
    }

    /// Mean score per visit, `0` for an unvisited node.
    pub fn average_score(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.accumulated_score / self.visit_count as f64
        }
    }

    /// Whether a playout won by `winner` counts in this node's favour.
    pub fn is_credited_to(&self, winner: Symbol) -> bool {
        self.to_move != winner
    }
}

/// Upper confidence bound of a child with the given statistics.
///
/// Unvisited children come first (`+∞`) unless `exploration` is zero, in which case they score
/// `0` and selection becomes purely greedy.
pub fn uct_value(
    accumulated_score: f64,
    visit_count: u32,
    parent_visits: u32,
    exploration: f64,
) -> f64 {
    if visit_count == 0 {
        return if exploration == 0.0 { 0.0 } else { f64::INFINITY };
    }

    let visits = visit_count as f64;
    let average = accumulated_score / visits;
    if exploration == 0.0 {
        return average;
    }
    average + exploration * ((parent_visits as f64).ln() / visits).sqrt()
}

#[cfg(test)]
mod tests {
    use crate::game::{Game, Symbol};
    use crate::games::k_in_row::{KInRow, Position};
    use crate::mcts_node::{MctsNode, uct_value};

    #[test]
    fn unvisited_children() {
        assert_eq!(uct_value(0.0, 0, 10, 0.0), 0.0);
        assert_eq!(uct_value(0.0, 0, 10, 1.4), f64::INFINITY);
    }

    #[test]
    fn greedy_uct_is_the_average() {
        assert_eq!(uct_value(6.0, 4, 10, 0.0), 1.5);
        // a huge sentinel-sized score must not turn into NaN
        assert_eq!(uct_value(-9.0e18, 1, 1, 0.0), -9.0e18);
    }

    #[test]
    fn exploration_bonus_shrinks_with_visits() {
        let few = uct_value(2.0, 2, 100, std::f64::consts::SQRT_2);
        let many = uct_value(20.0, 20, 100, std::f64::consts::SQRT_2);

        assert!(few > many);
        assert!(many > 1.0);
    }

    #[test]
    fn node_tracks_the_mover() {
        let game = KInRow::tic_tac_toe();
        let root = MctsNode::new(&game, game.initial_state(), None);
        let action = Position::new(2, 2);
        let child = MctsNode::new(
            &game,
            game.result(&root.state, &action),
            Some(action),
        );

        assert_eq!(root.to_move, Symbol::X);
        assert_eq!(child.to_move, Symbol::O);
        assert!(child.is_credited_to(Symbol::X));
        assert!(!child.is_credited_to(Symbol::O));
        assert_eq!(child.average_score(), 0.0);
    }
}
