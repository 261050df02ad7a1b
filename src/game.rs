use std::fmt;

/// The central trait of the library, defining the rules of a two-player game.
///
/// Every search in this crate talks to a game only through this trait. Implementations must
/// be pure: `result` produces a new state and never mutates the one it was given, so a single
/// rules object can be shared by any number of searches.
pub trait Game {
    /// An immutable snapshot of a position.
    type State: Clone + PartialEq + fmt::Debug;

    /// The type representing a legal action, e.g. a board coordinate.
    type Action: Clone + PartialEq + fmt::Debug;

    /// Returns the position the game starts from.
    fn initial_state(&self) -> Self::State;

    /// Returns the symbol whose turn it is in `state`.
    fn to_move(&self, state: &Self::State) -> Symbol;

    /// Returns the legal actions available in `state`.
    fn actions<'s>(&self, state: &'s Self::State) -> &'s [Self::Action];

    /// Applies `action` to `state`. Illegal actions leave the state unchanged.
    fn result(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Returns the value of `state` as seen by `player`.
    fn utility(&self, state: &Self::State, player: Symbol) -> f64;

    /// Returns `true` if the game is over in `state`.
    fn terminal_test(&self, state: &Self::State) -> bool;

    /// Returns the symbol that has won in `state`, if any.
    fn winner(&self, state: &Self::State) -> Option<Symbol>;

    /// Static heuristic score of a non-terminal position, from the perspective of the player
    /// to move.
    fn evaluate(&self, state: &Self::State) -> f64;

    /// Renders `state` as text.
    fn display(&self, state: &Self::State) -> String;

    /// The deepest ply any game can reach.
    fn max_depth(&self) -> usize;

    /// When more actions than this remain, bounded searches may play a random move instead of
    /// searching. `None` disables the shortcut.
    fn opening_threshold(&self) -> Option<usize> {
        None
    }
}

/// The two symbols of the game. `X` always moves first.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The symbol that moves first.
    pub const FIRST: Symbol = Symbol::X;

    /// Returns the other symbol.
    pub fn opponent(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}
