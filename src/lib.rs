//! # MCTS Player
//!
//! Move-selection core of a neural-network guided Monte Carlo Tree Search
//! player for a two-player board game.
//!
//! ## Features
//!
//! - **Batched search**: virtual losses spread each batch of leaves over the
//!   tree so one predictor call evaluates many positions
//! - **Inference plumbing**: feature planes, board symmetry augmentation and an
//!   optional shared inference cache
//! - **Time control**: fixed readouts or a per-move time budget derived from a
//!   total game clock
//! - **Game records**: per-move search statistics and model provenance
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mcts_player::{Game, MctsPlayer, Options, Tree, UniformPredictor};
//!
//! let tree = Tree::new(my_empty_position);
//! let mut player = MctsPlayer::new(
//!     tree,
//!     Box::new(UniformPredictor::default()),
//!     None,
//!     Game::default(),
//!     Options::default(),
//! )?;
//! let mv = player.suggest_move(player.options().num_readouts, true)?;
//! player.play_move(mv)?;
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Board primitives and the position contract
pub mod game;

/// Search tree, move selection and the player
pub mod mcts;

/// Predictor contract, features, symmetries and the inference cache
pub mod neural;

/// Game history and move records
pub mod recording;

/// Logger setup
pub mod logging;

// ============================================================================
// INTERNAL MODULES (not exposed publicly)
// ============================================================================

#[cfg(test)]
mod test_support;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use game::*;
pub use mcts::*;
pub use neural::*;
pub use recording::*;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the MCTS player
#[derive(Debug, thiserror::Error)]
pub enum MctsError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Illegal move: {mv}")]
    IllegalMove { mv: Move },

    #[error("Can't play move {mv}, game is over")]
    GameOver { mv: Move },

    #[error("Predictor error: {0}")]
    Predictor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MctsError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
