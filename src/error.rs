use thiserror::Error;

/// Errors raised while validating a configuration.
///
/// Searches themselves never fail; an unusable board is the only thing worth reporting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board size must be at least 1")]
    EmptyBoard,

    #[error("a run of {k} cannot fit on a {size}x{size} board")]
    RunTooLong { k: usize, size: usize },
}
