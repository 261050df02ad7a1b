use crate::game::{Game, Symbol};
use crate::heuristic;
use std::collections::BTreeMap;
use std::fmt;

/// Sparse board: occupied positions only.
pub type Board = BTreeMap<Position, Symbol>;

/// Horizontal, vertical, and both diagonals. Opposite directions are walked by negation.
pub const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (1, -1), (1, 1)];

/// A 1-based board coordinate.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Steps by `(dr, dc)`. Returns `None` when the step leaves the positive quadrant.
    fn offset(self, dr: i64, dc: i64) -> Option<Position> {
        let row = self.row as i64 + dr;
        let col = self.col as i64 + dc;
        if row < 1 || col < 1 {
            return None;
        }
        Some(Position::new(row as usize, col as usize))
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A move as handed over by a front-end: either a coordinate or whatever the user typed.
///
/// Only `Coordinate` moves can ever be legal. A `RawToken` is carried through so that the
/// caller can apply it like any other move; the rules ignore it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Move {
    Coordinate(Position),
    RawToken(String),
}

impl Move {
    /// Parses `"r c"`, `"r,c"` or `"(r, c)"`. Anything else is kept verbatim as a `RawToken`.
    pub fn parse(input: &str) -> Move {
        let trimmed = input.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(trimmed);
        let parts: Vec<&str> = inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if let [row, col] = parts.as_slice() {
            if let (Ok(row), Ok(col)) = (row.parse::<usize>(), col.parse::<usize>()) {
                return Move::Coordinate(Position::new(row, col));
            }
        }

        Move::RawToken(input.to_string())
    }

    /// The coordinate of this move, if it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Move::Coordinate(position) => Some(*position),
            Move::RawToken(_) => None,
        }
    }
}

impl From<Position> for Move {
    fn from(position: Position) -> Self {
        Move::Coordinate(position)
    }
}

/// An immutable snapshot of a k-in-row position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    to_move: Symbol,
    last_move: Option<Position>,
    utility: i32,
    board: Board,
    remaining_moves: Vec<Position>,
}

impl GameState {
    /// The symbol whose turn it is.
    pub fn to_move(&self) -> Symbol {
        self.to_move
    }

    /// The move that produced this state. `None` for the initial state.
    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    /// `+k` if `X` just completed a run, `-k` if `O` did, `0` otherwise.
    pub fn utility(&self) -> i32 {
        self.utility
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn remaining_moves(&self) -> &[Position] {
        &self.remaining_moves
    }
}

/// Rules of tic-tac-toe generalized to a `size`×`size` board where `k` in a row wins.
///
/// The rules object holds configuration only and is never mutated by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KInRow {
    size: usize,
    k: usize,
    max_depth: usize,
}

impl KInRow {
    /// Creates the rules. A non-positive `k` means "fill a whole line", i.e. `k = size`.
    pub fn new(size: usize, k: i32) -> Self {
        let k = if k <= 0 { size } else { k as usize };
        Self {
            size,
            k,
            max_depth: size * size,
        }
    }

    /// Classic 3×3 tic-tac-toe.
    pub fn tic_tac_toe() -> Self {
        KInRow::new(3, 3)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Whether `position` lies on the grid.
    pub fn contains(&self, position: Position) -> bool {
        (1..=self.size).contains(&position.row) && (1..=self.size).contains(&position.col)
    }

    /// Every position of the grid in row-major order.
    pub fn all_positions(&self) -> Vec<Position> {
        let size = self.size;
        (1..=size)
            .flat_map(|row| (1..=size).map(move |col| Position::new(row, col)))
            .collect()
    }

    /// Builds an arbitrary position from the cells held by each symbol.
    ///
    /// Cells outside the grid are dropped. A cell listed for both symbols goes to `O`, so the
    /// board and the remaining moves always partition the grid.
    ///
    /// The utility is derived from `last_move` when that cell is occupied, so a state built
    /// around a finishing move is recognized as won.
    pub fn state_from_positions(
        &self,
        to_move: Symbol,
        last_move: Option<Position>,
        x_positions: &[Position],
        o_positions: &[Position],
    ) -> GameState {
        let mut board = Board::new();
        let cells = x_positions
            .iter()
            .map(|&position| (position, Symbol::X))
            .chain(o_positions.iter().map(|&position| (position, Symbol::O)));
        for (position, symbol) in cells.filter(|&(position, _)| self.contains(position)) {
            board.insert(position, symbol);
        }

        let remaining_moves = self
            .all_positions()
            .into_iter()
            .filter(|position| !board.contains_key(position))
            .collect();

        let utility = match last_move.and_then(|m| board.get(&m).map(|&player| (m, player))) {
            Some((m, player)) => self.compute_utility(&board, m, player),
            None => 0,
        };

        GameState {
            to_move,
            last_move,
            utility,
            board,
            remaining_moves,
        }
    }

    /// Applies a front-end move. Raw tokens are never legal and leave the state unchanged.
    pub fn apply(&self, state: &GameState, b_move: &Move) -> GameState {
        match b_move {
            Move::Coordinate(position) => self.result(state, position),
            Move::RawToken(_) => state.clone(),
        }
    }

    /// Returns `k` if `player` is `X` and has a run of at least `k` through `b_move`, `-k` for
    /// `O` under the same condition, `0` otherwise.
    pub fn compute_utility(&self, board: &Board, b_move: Position, player: Symbol) -> i32 {
        let completed = DIRECTIONS
            .iter()
            .any(|&direction| KInRow::k_in_row(board, b_move, player, direction, self.k));

        match (completed, player) {
            (false, _) => 0,
            (true, Symbol::X) => self.k as i32,
            (true, Symbol::O) => -(self.k as i32),
        }
    }

    /// Returns `true` if the run of `player` cells through `pos` along `direction` (both ways)
    /// is at least `k` long.
    pub fn k_in_row(
        board: &Board,
        pos: Position,
        player: Symbol,
        direction: (i64, i64),
        k: usize,
    ) -> bool {
        let walk = |dr: i64, dc: i64| -> i64 {
            let mut count = 0;
            let mut cursor = Some(pos);
            while let Some(position) = cursor {
                if board.get(&position) != Some(&player) {
                    break;
                }
                count += 1;
                cursor = position.offset(dr, dc);
            }
            count
        };

        let (dr, dc) = direction;
        // both walks start on `pos`
        let count = walk(dr, dc) + walk(-dr, -dc) - 1;
        count >= k as i64
    }
}

impl Game for KInRow {
    type State = GameState;
    type Action = Position;

    fn initial_state(&self) -> GameState {
        GameState {
            to_move: Symbol::FIRST,
            last_move: None,
            utility: 0,
            board: Board::new(),
            remaining_moves: self.all_positions(),
        }
    }

    fn to_move(&self, state: &GameState) -> Symbol {
        state.to_move
    }

    fn actions<'s>(&self, state: &'s GameState) -> &'s [Position] {
        &state.remaining_moves
    }

    fn result(&self, state: &GameState, action: &Position) -> GameState {
        if !state.remaining_moves.contains(action) {
            return state.clone();
        }

        let mut board = state.board.clone();
        board.insert(*action, state.to_move);
        let remaining_moves = state
            .remaining_moves
            .iter()
            .filter(|&position| position != action)
            .copied()
            .collect();
        let utility = self.compute_utility(&board, *action, state.to_move);

        GameState {
            to_move: state.to_move.opponent(),
            last_move: Some(*action),
            utility,
            board,
            remaining_moves,
        }
    }

    fn utility(&self, state: &GameState, player: Symbol) -> f64 {
        match player {
            Symbol::X => state.utility as f64,
            Symbol::O => -state.utility as f64,
        }
    }

    fn terminal_test(&self, state: &GameState) -> bool {
        state.utility != 0 || state.remaining_moves.is_empty()
    }

    fn winner(&self, state: &GameState) -> Option<Symbol> {
        match state.utility {
            u if u > 0 => Some(Symbol::X),
            u if u < 0 => Some(Symbol::O),
            _ => None,
        }
    }

    fn evaluate(&self, state: &GameState) -> f64 {
        heuristic::eval1(self, state)
    }

    fn display(&self, state: &GameState) -> String {
        let mut out = String::new();
        for row in (1..=self.size).rev() {
            let cells: Vec<String> = (1..=self.size)
                .map(|col| match state.board.get(&Position::new(row, col)) {
                    Some(symbol) => symbol.to_string(),
                    None => ".".to_string(),
                })
                .collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }
        out
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn opening_threshold(&self) -> Option<usize> {
        let k = self.k as i64;
        Some((k * k - k - 1).max(0) as usize)
    }
}
