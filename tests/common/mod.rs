//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use mcts_player::{
    BoardFeatures, Color, Inference, ModelOutput, Move, Position, Predictor, Result, NUM_MOVES,
    NUM_POINTS,
};
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Board where stones go on any empty point and stay there. Two passes in a
/// row end the game.
#[derive(Debug, Clone)]
pub struct OpenBoard {
    stones: Vec<Option<Color>>,
    to_play: Color,
    move_number: usize,
    passes: u8,
}

impl OpenBoard {
    pub fn new() -> Self {
        Self {
            stones: vec![None; NUM_POINTS],
            to_play: Color::Black,
            move_number: 0,
            passes: 0,
        }
    }
}

impl Position for OpenBoard {
    fn to_play(&self) -> Color {
        self.to_play
    }

    fn move_number(&self) -> usize {
        self.move_number
    }

    fn stones(&self) -> &[Option<Color>] {
        &self.stones
    }

    fn is_legal(&self, mv: Move) -> bool {
        match mv {
            Move::Point(p) => self.stones.get(p as usize) == Some(&None),
            Move::Pass => true,
            Move::Resign => false,
        }
    }

    fn play(&self, mv: Move) -> Self {
        let mut next = self.clone();
        if let Move::Point(p) = mv {
            next.stones[p as usize] = Some(self.to_play);
            next.passes = 0;
        } else {
            next.passes += 1;
        }
        next.to_play = self.to_play.other();
        next.move_number += 1;
        next
    }

    fn calculate_score(&self, komi: f32) -> f32 {
        self.stones
            .iter()
            .flatten()
            .map(|c| if *c == Color::Black { 1.0 } else { -1.0 })
            .sum::<f32>()
            - komi
    }

    fn is_game_over(&self) -> bool {
        self.passes >= 2
    }

    fn stone_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.stones.hash(&mut hasher);
        self.to_play.hash(&mut hasher);
        hasher.finish()
    }
}

/// Uniform over board points, never passes, and counts the positions it was
/// asked to evaluate.
pub struct CountingPredictor {
    pub evaluated: Rc<Cell<usize>>,
    pub value: f32,
}

impl CountingPredictor {
    pub fn new() -> Self {
        Self {
            evaluated: Rc::new(Cell::new(0)),
            value: 0.0,
        }
    }
}

impl Predictor for CountingPredictor {
    fn evaluate(&mut self, features: &[BoardFeatures]) -> Result<Inference> {
        self.evaluated.set(self.evaluated.get() + features.len());
        let mut policy = vec![1.0 / NUM_POINTS as f32; NUM_MOVES];
        policy[NUM_POINTS] = 0.0;
        Ok(Inference {
            outputs: vec![
                ModelOutput {
                    policy,
                    value: self.value
                };
                features.len()
            ],
            model: "counting".to_string(),
        })
    }
}
