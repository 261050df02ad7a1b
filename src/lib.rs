//! Game-playing agents for tic-tac-toe generalized to an n×n board and a winning run of k.
//!
//! The rules live behind the [`game::Game`] trait and every agent talks to them only through
//! it: exhaustive minimax and alpha-beta, depth-limited variants driven by iterative deepening
//! under a time budget, and Monte Carlo tree search with UCT. Each agent is also available as a
//! [`strategy::Strategy`], the single interface a front-end needs.
//!
//! # Example
//!
//! ```rust
//! use k_in_row_search::config::MctsConfig;
//! use k_in_row_search::game::Game;
//! use k_in_row_search::games::k_in_row::KInRow;
//! use k_in_row_search::mcts::MonteCarloTreeSearch;
//! use k_in_row_search::random::CustomNumberGenerator;
//! use k_in_row_search::search::alpha_beta;
//!
//! // Four-in-a-row on a 4x4 board
//! let game = KInRow::new(4, 4);
//! let state = game.initial_state();
//!
//! // Create and configure a new MCTS search instance using the builder
//! let mut mcts = MonteCarloTreeSearch::builder(&game, state.clone())
//!     .with_random_generator(CustomNumberGenerator::default())
//!     .with_config(&MctsConfig::for_testing())
//!     .build();
//!
//! let best_move = mcts.search();
//! println!("The best move is: {:?}", best_move);
//! assert!(best_move.is_some());
//!
//! // Exhaustive search is fine for classic tic-tac-toe
//! let game = KInRow::tic_tac_toe();
//! assert!(alpha_beta(&game, &game.initial_state()).is_some());
//! ```

/// Validated settings for boards and players.
pub mod config;
/// Iterative deepening under a time budget, and the players built on it.
pub mod deepening;
/// Configuration errors.
pub mod error;
/// Contains the `Game` trait and the `Symbol` enum that define the interface for a game.
pub mod game;
/// Contains implementations of the `Game` trait.
pub mod games;
/// The `eval1` heuristic for cut-off positions.
pub mod heuristic;
/// Monte Carlo tree search with UCT.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Minimax and alpha-beta, exhaustive or depth-limited.
pub mod search;
/// The `Strategy` trait, the random player, and a game loop.
pub mod strategy;
