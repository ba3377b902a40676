//! Game record data structures.
//!
//! One [`MoveRecord`] is produced per committed move together with the search
//! statistics that led to it, so finished games can double as training data.

use crate::game::coord::{Color, Move};
use crate::game::position::Stones;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rules-level options shared by the players of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Compensation added to white's score.
    pub komi: f32,
    pub resign_enabled: bool,
    /// Resign when the root value for the side to move falls below this.
    pub resign_threshold: f32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            komi: 7.5,
            resign_enabled: true,
            resign_threshold: -0.999,
        }
    }
}

impl fmt::Display for GameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " komi:{} resign_enabled:{} resign_threshold:{}",
            self.komi, self.resign_enabled, self.resign_threshold
        )
    }
}

/// Record of a single committed move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Side that played the move.
    pub color: Color,
    pub mv: Move,
    /// Board before the move was played.
    pub stones: Stones,
    /// Models used plus the root's search summary.
    pub comment: String,
    /// Root value estimate, black's perspective.
    pub q: f32,
    /// Normalised visit distribution over the move space.
    pub search_pi: Vec<f32>,
    /// Models that served inference for this move, oldest first.
    pub models: Vec<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    Resign,
    Passes,
    MoveLimit,
}

/// Complete record of a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub options: GameOptions,
    /// Game start timestamp
    pub timestamp: i64,
    pub moves: Vec<MoveRecord>,
    pub game_over_reason: Option<GameOverReason>,
    pub winner: Option<Color>,
    /// Final score from black's perspective; unset for resignations.
    pub score: Option<f32>,
}

impl GameRecord {
    pub fn new(options: GameOptions) -> Self {
        Self {
            options,
            timestamp: chrono::Utc::now().timestamp(),
            moves: Vec::new(),
            game_over_reason: None,
            winner: None,
            score: None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over_reason.is_some()
    }

    /// Result in SGF style: `B+R`, `W+3.5`, `0` for a tie, `void` while the
    /// game is still running.
    pub fn result_string(&self) -> String {
        match (self.game_over_reason, self.winner, self.score) {
            (None, _, _) => "void".to_string(),
            (Some(GameOverReason::Resign), Some(winner), _) => format!("{}+R", winner),
            (Some(_), _, Some(score)) => format_score(score),
            _ => "void".to_string(),
        }
    }
}

pub fn format_score(score: f32) -> String {
    if score > 0.0 {
        format!("B+{:.1}", score)
    } else if score < 0.0 {
        format!("W+{:.1}", -score)
    } else {
        "0".to_string()
    }
}
