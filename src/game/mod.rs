pub mod coord;
pub mod position;

pub use coord::{Color, Move, MAX_MOVES, N, NUM_MOVES, NUM_POINTS, PASS_INDEX};
pub use position::{Position, Stones};
