//! Contains implementations of the `Game` trait.

/// Tic-tac-toe generalized to an n×n board with a winning run of length k.
pub mod k_in_row;
