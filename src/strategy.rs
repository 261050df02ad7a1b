use crate::game::{Game, Symbol};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use tracing::debug;

/// A way of picking moves. This is the only interface a front-end needs.
pub trait Strategy<G: Game> {
    /// Picks an action for the player to move in `state`. Returns `None` only when there are no
    /// legal actions, which the caller should treat as the end of the game.
    fn choose(&mut self, game: &G, state: &G::State) -> Option<G::Action>;
}

/// Picks a legal action uniformly at random.
#[derive(Debug, Default, Clone)]
pub struct RandomPlayer<K: RandomGenerator = StandardRandomGenerator> {
    random: K,
}

impl<K: RandomGenerator> RandomPlayer<K> {
    pub fn new(random: K) -> Self {
        Self { random }
    }
}

impl<G: Game, K: RandomGenerator> Strategy<G> for RandomPlayer<K> {
    fn choose(&mut self, game: &G, state: &G::State) -> Option<G::Action> {
        self.random.choose(game.actions(state)).cloned()
    }
}

/// Plays a game from the initial state, letting `players` move in turn, and returns the final
/// utility for the first symbol.
///
/// A player with no move to offer ends the game where it stands.
pub fn play_game<G: Game>(game: &G, players: &mut [&mut dyn Strategy<G>]) -> f64 {
    let mut state = game.initial_state();
    if players.is_empty() {
        return game.utility(&state, Symbol::FIRST);
    }

    loop {
        for player in players.iter_mut() {
            let Some(action) = player.choose(game, &state) else {
                debug!("no legal moves left, ending the game");
                return game.utility(&state, Symbol::FIRST);
            };

            state = game.result(&state, &action);
            if game.terminal_test(&state) {
                debug!("game over\n{}", game.display(&state));
                return game.utility(&state, Symbol::FIRST);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::game::Game;
    use crate::games::k_in_row::{GameState, KInRow, Position};
    use crate::random::CustomNumberGenerator;
    use crate::search::alpha_beta;
    use crate::strategy::{RandomPlayer, Strategy, play_game};

    struct ExactAlphaBeta;

    impl Strategy<KInRow> for ExactAlphaBeta {
        fn choose(&mut self, game: &KInRow, state: &GameState) -> Option<Position> {
            alpha_beta(game, state)
        }
    }

    #[test]
    fn random_player_picks_legal_moves() {
        let game = KInRow::new(4, 3);
        let state = game.initial_state();
        let mut player = RandomPlayer::new(CustomNumberGenerator::new(7));

        for _ in 0..20 {
            let action = player.choose(&game, &state).unwrap();
            assert!(state.remaining_moves().contains(&action));
        }
    }

    #[test]
    fn random_player_passes_on_a_full_board() {
        let game = KInRow::new(1, 1);
        let state = game.result(&game.initial_state(), &Position::new(1, 1));
        let mut player = RandomPlayer::new(CustomNumberGenerator::default());

        assert_eq!(player.choose(&game, &state), None);
    }

    #[test]
    fn random_game_ends_with_a_legal_utility() {
        let game = KInRow::tic_tac_toe();
        let mut first = RandomPlayer::new(CustomNumberGenerator::new(1));
        let mut second = RandomPlayer::new(CustomNumberGenerator::new(2));

        let players: &mut [&mut dyn Strategy<KInRow>] = &mut [&mut first, &mut second];
        let utility = play_game(&game, players);

        assert!([-3.0, 0.0, 3.0].contains(&utility));
    }

    #[test]
    fn perfect_play_is_a_draw() {
        let game = KInRow::tic_tac_toe();
        let mut first = ExactAlphaBeta;
        let mut second = ExactAlphaBeta;

        let players: &mut [&mut dyn Strategy<KInRow>] = &mut [&mut first, &mut second];
        assert_eq!(play_game(&game, players), 0.0);
    }

    #[test]
    fn perfect_play_beats_random_play_or_draws() {
        let game = KInRow::tic_tac_toe();
        let mut first = ExactAlphaBeta;
        let mut second = RandomPlayer::new(CustomNumberGenerator::new(11));

        let players: &mut [&mut dyn Strategy<KInRow>] = &mut [&mut first, &mut second];
        let utility = play_game(&game, players);

        assert!(utility >= 0.0);
    }
}
