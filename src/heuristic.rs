//! Static evaluation of k-in-row positions, used when a bounded search stops before the game
//! is over.

use crate::game::Symbol;
use crate::games::k_in_row::{Board, DIRECTIONS, GameState, KInRow, Position};

/// Weight applied to a cell that opens more than one line at once.
const DOUBLE_THREAT_WEIGHT: i64 = 5;

/// Scores `state` from the perspective of the player to move.
///
/// A decided position is worth `±∞`. Otherwise every empty cell contributes the difference
/// between how many `k-1` and `k` runs the mover could make by taking it and how many the
/// opponent could; a cell that completes several lines at once counts five times over.
/// Positions with at most `k/2` empty cells are not worth scoring and return `0`.
pub fn eval1(game: &KInRow, state: &GameState) -> f64 {
    let k = game.k() as i32;
    let mover = state.to_move();

    if state.utility() != 0 {
        let x_won = state.utility() == k;
        return match (x_won, mover) {
            (true, Symbol::X) | (false, Symbol::O) => f64::INFINITY,
            (true, Symbol::O) | (false, Symbol::X) => f64::NEG_INFINITY,
        };
    }

    if state.remaining_moves().len() as f64 <= game.k() as f64 / 2.0 {
        return 0.0;
    }

    let opponent = mover.opponent();
    let score: i64 = state
        .remaining_moves()
        .iter()
        .filter(|&position| !state.board().contains_key(position))
        .map(|&position| {
            potential_score(game, state.board(), position, mover)
                - potential_score(game, state.board(), position, opponent)
        })
        .sum();

    score as f64
}

fn potential_score(game: &KInRow, board: &Board, position: Position, player: Symbol) -> i64 {
    let mut scratch = board.clone();
    scratch.insert(position, player);

    [game.k().saturating_sub(1), game.k()]
        .iter()
        .map(|&length| {
            let lines = DIRECTIONS
                .iter()
                .filter(|&&direction| {
                    KInRow::k_in_row(&scratch, position, player, direction, length)
                })
                .count() as i64;
            if lines > 1 {
                lines * DOUBLE_THREAT_WEIGHT
            } else {
                lines
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use crate::game::{Game, Symbol};
    use crate::games::k_in_row::{KInRow, Position};
    use crate::heuristic::eval1;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn empty_board_is_balanced() {
        let game = KInRow::new(4, 3);
        assert_eq!(eval1(&game, &game.initial_state()), 0.0);
    }

    #[test]
    fn won_position_is_infinite_for_the_mover() {
        let game = KInRow::tic_tac_toe();
        let x_won = game.state_from_positions(
            Symbol::O,
            Some(p(1, 3)),
            &[p(1, 1), p(1, 2), p(1, 3)],
            &[p(2, 1), p(2, 2)],
        );
        let o_won = game.state_from_positions(
            Symbol::X,
            Some(p(2, 3)),
            &[p(1, 1), p(1, 2), p(3, 3)],
            &[p(2, 1), p(2, 2), p(2, 3)],
        );

        assert_eq!(x_won.utility(), 3);
        assert_eq!(eval1(&game, &x_won), f64::NEG_INFINITY);
        assert_eq!(o_won.utility(), -3);
        assert_eq!(eval1(&game, &o_won), f64::NEG_INFINITY);
    }

    #[test]
    fn sign_follows_to_move() {
        let game = KInRow::tic_tac_toe();
        let x_to_move =
            game.state_from_positions(Symbol::X, Some(p(1, 3)), &[p(1, 1), p(1, 2), p(1, 3)], &[]);
        let o_to_move =
            game.state_from_positions(Symbol::O, Some(p(1, 3)), &[p(1, 1), p(1, 2), p(1, 3)], &[]);

        assert_eq!(eval1(&game, &x_to_move), f64::INFINITY);
        assert_eq!(eval1(&game, &o_to_move), f64::NEG_INFINITY);
    }

    #[test]
    fn undecided_positions_are_finite() {
        let game = KInRow::tic_tac_toe();
        let state = game.state_from_positions(
            Symbol::X,
            Some(p(2, 2)),
            &[p(1, 1), p(1, 2)],
            &[p(2, 1), p(2, 2)],
        );

        assert!(eval1(&game, &state).is_finite());
    }

    #[test]
    fn swapping_the_mover_negates_the_score() {
        let game = KInRow::new(4, 3);
        let xs = [p(1, 1), p(2, 2)];
        let os = [p(1, 2)];
        let x_to_move = game.state_from_positions(Symbol::X, None, &xs, &os);
        let o_to_move = game.state_from_positions(Symbol::O, None, &xs, &os);

        assert_eq!(eval1(&game, &x_to_move), -eval1(&game, &o_to_move));
    }

    #[test]
    fn nearly_full_board_short_circuits_to_zero() {
        let game = KInRow::tic_tac_toe();
        // one empty cell left, 1 <= 3/2
        let state = game.state_from_positions(
            Symbol::X,
            None,
            &[p(1, 1), p(1, 3), p(2, 3), p(3, 2)],
            &[p(1, 2), p(2, 1), p(2, 2), p(3, 3)],
        );

        assert_eq!(state.remaining_moves(), &[p(3, 1)]);
        assert_eq!(eval1(&game, &state), 0.0);
    }
}
