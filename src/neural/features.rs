//! Input feature planes for the policy/value predictor.
//!
//! Layout is point-major: `features[point * NUM_STONE_FEATURES + plane]`.
//!
//! Planes:
//!   0, 2, .., 14   stones of the side to move, most recent position first
//!   1, 3, .., 15   stones of the opponent, same history order
//!   16             1.0 everywhere when black is to move
//!
//! Histories shorter than `MOVE_HISTORY` leave the missing planes at zero.

use crate::game::coord::{Color, NUM_POINTS};
use crate::game::position::Position;

/// Number of positions fed to the predictor, current one included.
pub const MOVE_HISTORY: usize = 8;

/// Feature planes per point.
pub const NUM_STONE_FEATURES: usize = 2 * MOVE_HISTORY + 1;

/// Total length of one feature tensor.
pub const FEATURE_LEN: usize = NUM_POINTS * NUM_STONE_FEATURES;

pub type BoardFeatures = Vec<f32>;

/// Builds the raw (unaugmented) feature tensor.
///
/// `history` holds the leaf position first, then its predecessors.
pub fn set_features<P: Position>(history: &[&P], to_play: Color) -> BoardFeatures {
    let mut features = vec![0.0f32; FEATURE_LEN];

    for (depth, position) in history.iter().take(MOVE_HISTORY).enumerate() {
        let stones = position.stones();
        debug_assert_eq!(stones.len(), NUM_POINTS);
        for (point, stone) in stones.iter().enumerate() {
            let base = point * NUM_STONE_FEATURES;
            match stone {
                Some(color) if *color == to_play => features[base + 2 * depth] = 1.0,
                Some(_) => features[base + 2 * depth + 1] = 1.0,
                None => {}
            }
        }
    }

    if to_play == Color::Black {
        for point in 0..NUM_POINTS {
            features[point * NUM_STONE_FEATURES + 2 * MOVE_HISTORY] = 1.0;
        }
    }
    features
}
