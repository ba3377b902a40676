//! Game recording.
//!
//! # Components
//!
//! - `game_record`: data structures for moves and finished games
//! - `game_history`: the history collaborator the player reports to

pub mod game_history;
pub mod game_record;

pub use game_history::{Game, GameHistory};
pub use game_record::{format_score, GameOptions, GameOverReason, GameRecord, MoveRecord};
