//! Board position contract.
//!
//! Legality, capture and scoring rules live outside the search core. The
//! search only needs the queries below, so any rules engine can plug in by
//! implementing [`Position`].

use crate::game::coord::{Color, Move};

/// Snapshot of the stones on the board, one entry per point.
pub type Stones = Vec<Option<Color>>;

pub trait Position: Clone {
    /// Side to move.
    fn to_play(&self) -> Color;

    /// Number of moves played to reach this position.
    fn move_number(&self) -> usize;

    /// Stones on the board, indexed by point.
    fn stones(&self) -> &[Option<Color>];

    fn is_legal(&self, mv: Move) -> bool;

    /// Returns the position after `mv`. Only called with legal moves.
    fn play(&self, mv: Move) -> Self;

    /// Score from black's perspective, `komi` already subtracted.
    fn calculate_score(&self, komi: f32) -> f32;

    /// True once the game has ended by consecutive passes.
    fn is_game_over(&self) -> bool;

    /// Fingerprint of the stone configuration and side to move.
    fn stone_hash(&self) -> u64;
}
