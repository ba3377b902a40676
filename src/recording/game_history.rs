//! Game history collaborator.
//!
//! The player forwards every committed move here and reports how the game
//! ended. [`Game`] keeps everything in memory; persisting records is left to
//! the caller (the record is `serde`-serialisable).

use crate::game::coord::Color;
use crate::recording::game_record::{GameOptions, GameOverReason, GameRecord, MoveRecord};

pub trait GameHistory {
    fn options(&self) -> &GameOptions;
    fn new_game(&mut self);
    fn undo_move(&mut self);
    fn add_move(&mut self, record: MoveRecord);
    fn get_move(&self, index: usize) -> Option<&MoveRecord>;
    fn num_moves(&self) -> usize;
    fn is_game_over(&self) -> bool;
    fn set_game_over_because_of_resign(&mut self, winner: Color);
    fn set_game_over_because_move_limit_reached(&mut self, score: f32);
    fn set_game_over_because_of_passes(&mut self, score: f32);
    fn result_string(&self) -> String;
}

/// In-memory game history.
#[derive(Debug, Clone)]
pub struct Game {
    record: GameRecord,
}

impl Game {
    pub fn new(options: GameOptions) -> Self {
        Self {
            record: GameRecord::new(options),
        }
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn winner(&self) -> Option<Color> {
        self.record.winner
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.record.game_over_reason
    }

    fn finish(&mut self, reason: GameOverReason, winner: Color, score: Option<f32>) {
        self.record.game_over_reason = Some(reason);
        self.record.winner = Some(winner);
        self.record.score = score;
        log::info!(
            "Game over after {} moves ({:?}): {}",
            self.record.moves.len(),
            reason,
            self.record.result_string()
        );
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameOptions::default())
    }
}

fn winner_from_score(score: f32) -> Color {
    if score > 0.0 {
        Color::Black
    } else {
        Color::White
    }
}

impl GameHistory for Game {
    fn options(&self) -> &GameOptions {
        &self.record.options
    }

    fn new_game(&mut self) {
        self.record = GameRecord::new(self.record.options.clone());
    }

    fn undo_move(&mut self) {
        if self.record.moves.pop().is_some() {
            self.record.game_over_reason = None;
            self.record.winner = None;
            self.record.score = None;
        }
    }

    fn add_move(&mut self, record: MoveRecord) {
        debug_assert!(!self.is_game_over(), "move added to a finished game");
        log::debug!(
            "Move {}: {} {} (q={:.3})",
            self.record.moves.len(),
            record.color,
            record.mv,
            record.q
        );
        self.record.moves.push(record);
    }

    fn get_move(&self, index: usize) -> Option<&MoveRecord> {
        self.record.moves.get(index)
    }

    fn num_moves(&self) -> usize {
        self.record.moves.len()
    }

    fn is_game_over(&self) -> bool {
        self.record.is_game_over()
    }

    fn set_game_over_because_of_resign(&mut self, winner: Color) {
        self.finish(GameOverReason::Resign, winner, None);
    }

    fn set_game_over_because_move_limit_reached(&mut self, score: f32) {
        self.finish(GameOverReason::MoveLimit, winner_from_score(score), Some(score));
    }

    fn set_game_over_because_of_passes(&mut self, score: f32) {
        self.finish(GameOverReason::Passes, winner_from_score(score), Some(score));
    }

    fn result_string(&self) -> String {
        self.record.result_string()
    }
}
