use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the board.
pub const N: usize = 9;

/// Number of intersections on the board.
pub const NUM_POINTS: usize = N * N;

/// Size of the move space: every point plus the pass move.
pub const NUM_MOVES: usize = NUM_POINTS + 1;

/// Index of the pass move inside the move space.
pub const PASS_INDEX: usize = NUM_POINTS;

/// Games are stopped once this many moves have been played.
pub const MAX_MOVES: usize = 2 * NUM_POINTS;

const COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRST";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn other(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// +1 for black, -1 for white. Values are stored from black's perspective.
    pub fn sign(self) -> f32 {
        match self {
            Color::Black => 1.0,
            Color::White => -1.0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "B"),
            Color::White => write!(f, "W"),
        }
    }
}

/// A move: a board point (row-major index), a pass, or a resignation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Point(u16),
    Pass,
    Resign,
}

impl Move {
    pub fn from_row_col(row: usize, col: usize) -> Self {
        debug_assert!(row < N && col < N);
        Move::Point((row * N + col) as u16)
    }

    /// Maps a move-space index back to a move. `PASS_INDEX` is the pass move.
    pub fn from_index(index: usize) -> Self {
        assert!(index < NUM_MOVES, "move index {} out of range", index);
        if index == PASS_INDEX {
            Move::Pass
        } else {
            Move::Point(index as u16)
        }
    }

    /// Index into the move space. Resignation has no index.
    pub fn index(self) -> Option<usize> {
        match self {
            Move::Point(p) => Some(p as usize),
            Move::Pass => Some(PASS_INDEX),
            Move::Resign => None,
        }
    }

    pub fn is_point(self) -> bool {
        matches!(self, Move::Point(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Point(p) => {
                let row = *p as usize / N;
                let col = *p as usize % N;
                write!(f, "{}{}", COLUMNS[col] as char, N - row)
            }
            Move::Pass => write!(f, "pass"),
            Move::Resign => write!(f, "resign"),
        }
    }
}
