extern crate k_in_row_search;

use k_in_row_search::config::{GameConfig, MctsConfig};
use k_in_row_search::deepening::AlphaBetaPlayer;
use k_in_row_search::game::{Game, Symbol};
use k_in_row_search::games::k_in_row::KInRow;
use k_in_row_search::mcts::MonteCarloPlayer;
use k_in_row_search::random::CustomNumberGenerator;
use k_in_row_search::strategy::{RandomPlayer, Strategy, play_game};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=k_in_row_search=debug shows what each search did
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = GameConfig::default();
    let game = config.build().expect("default config is valid");

    // Monte Carlo (X) against exhaustive alpha-beta (O), printing every position
    let mut mcts = MonteCarloPlayer::new(MctsConfig::for_testing());
    let mut alpha_beta = AlphaBetaPlayer::new(config.time_budget());
    let mut state = game.initial_state();
    while !game.terminal_test(&state) {
        let action = match game.to_move(&state) {
            Symbol::X => mcts.choose(&game, &state),
            Symbol::O => alpha_beta.choose(&game, &state),
        };
        let Some(action) = action else { break };

        println!("{} plays {}", game.to_move(&state), action);
        state = game.result(&state, &action);
        println!("{}", game.display(&state));
    }
    println!("Utility for X: {}", game.utility(&state, Symbol::X));

    // a bigger board, where the bounded searches have to cut off
    let config = GameConfig::default()
        .with_size(4)
        .with_k(3)
        .with_time_budget_secs(0.2);
    let game = config.build().expect("a 3-run fits on a 4x4 board");
    let mut first = AlphaBetaPlayer::new(config.time_budget())
        .with_random_generator(CustomNumberGenerator::new(1));
    let mut second = RandomPlayer::new(CustomNumberGenerator::new(2));
    let players: &mut [&mut dyn Strategy<KInRow>] = &mut [&mut first, &mut second];
    println!("4x4, k=3, alpha-beta vs random: {}", play_game(&game, players));
}
