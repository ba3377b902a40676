//! Fakes shared by the unit tests.

use crate::game::coord::{Color, Move, NUM_MOVES, NUM_POINTS};
use crate::game::position::Position;
use crate::mcts::node::NodeId;
use crate::mcts::options::Options;
use crate::mcts::tree::Tree;
use crate::neural::features::{BoardFeatures, NUM_STONE_FEATURES};
use crate::neural::predictor::{Inference, ModelOutput, Predictor};
use crate::neural::symmetry::Symmetry;
use crate::{MctsError, Result};
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Stones are placed on any empty point and never captured. Two passes in a
/// row end the game; the score is the stone difference minus komi.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPosition {
    stones: Vec<Option<Color>>,
    to_play: Color,
    move_number: usize,
    consecutive_passes: u8,
}

impl PlacementPosition {
    pub fn new() -> Self {
        Self {
            stones: vec![None; NUM_POINTS],
            to_play: Color::Black,
            move_number: 0,
            consecutive_passes: 0,
        }
    }
}

impl Default for PlacementPosition {
    fn default() -> Self {
        Self::new()
    }
}

impl Position for PlacementPosition {
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
            Move::Point(p) => (p as usize) < NUM_POINTS && self.stones[p as usize].is_none(),
            Move::Pass => true,
            Move::Resign => false,
        }
    }

    fn play(&self, mv: Move) -> Self {
        assert!(self.is_legal(mv), "{} is not legal here", mv);
        let mut next = self.clone();
        match mv {
            Move::Point(p) => {
                next.stones[p as usize] = Some(self.to_play);
                next.consecutive_passes = 0;
            }
            _ => next.consecutive_passes += 1,
        }
        next.to_play = self.to_play.other();
        next.move_number += 1;
        next
    }

    fn calculate_score(&self, komi: f32) -> f32 {
        let black = self.stones.iter().filter(|s| **s == Some(Color::Black)).count();
        let white = self.stones.iter().filter(|s| **s == Some(Color::White)).count();
        black as f32 - white as f32 - komi
    }

    fn is_game_over(&self) -> bool {
        self.consecutive_passes >= 2
    }

    fn stone_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.stones.hash(&mut hasher);
        self.to_play.hash(&mut hasher);
        hasher.finish()
    }
}

/// Small, deterministic options for player tests.
pub fn test_options() -> Options {
    Options {
        inject_noise: false,
        num_readouts: 16,
        virtual_losses: 4,
        random_seed: 17,
        ..Options::default()
    }
}

/// Overwrites child visit counts of `id`.
pub fn set_child_visits(tree: &mut Tree<PlacementPosition>, id: NodeId, visits: &[(usize, u32)]) {
    let node = tree.node_mut(id);
    for &(index, n) in visits {
        node.edges[index].n = n;
    }
}

/// Flat policy with a configurable pass prior and a fixed value. The model
/// name can be changed between calls through [`ScriptedPredictor::model_handle`].
pub struct ScriptedPredictor {
    model: Rc<RefCell<String>>,
    value: f32,
    pass_prior: f32,
}

impl ScriptedPredictor {
    pub fn new(model: &str) -> Self {
        Self {
            model: Rc::new(RefCell::new(model.to_string())),
            value: 0.0,
            pass_prior: 1.0 / NUM_MOVES as f32,
        }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    pub fn with_pass_prior(mut self, pass_prior: f32) -> Self {
        self.pass_prior = pass_prior;
        self
    }

    pub fn model_handle(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.model)
    }
}

impl Predictor for ScriptedPredictor {
    fn evaluate(&mut self, features: &[BoardFeatures]) -> Result<Inference> {
        let mut policy = vec![(1.0 - self.pass_prior) / NUM_POINTS as f32; NUM_MOVES];
        policy[NUM_POINTS] = self.pass_prior;
        let output = ModelOutput {
            policy,
            value: self.value,
        };
        Ok(Inference {
            outputs: vec![output; features.len()],
            model: self.model.borrow().clone(),
        })
    }
}

/// Finds the side to move's stone at `marker` in its (possibly transformed)
/// input, works out which symmetry was applied and answers with that
/// symmetry's image of `target` as the favourite move.
pub struct MarkerPredictor {
    marker: usize,
    target: usize,
}

impl MarkerPredictor {
    pub fn new(marker: usize, target: usize) -> Self {
        Self { marker, target }
    }
}

impl Predictor for MarkerPredictor {
    fn evaluate(&mut self, features: &[BoardFeatures]) -> Result<Inference> {
        let outputs = features
            .iter()
            .map(|f| {
                let seen = (0..NUM_POINTS).find(|&p| f[p * NUM_STONE_FEATURES] == 1.0);
                let symmetry = Symmetry::ALL
                    .into_iter()
                    .find(|s| Some(s.transform_point(self.marker)) == seen)
                    .unwrap_or(Symmetry::Identity);
                let mut policy = vec![0.001; NUM_MOVES];
                policy[symmetry.transform_point(self.target)] = 1.0;
                ModelOutput { policy, value: 0.0 }
            })
            .collect();
        Ok(Inference {
            outputs,
            model: "marker".to_string(),
        })
    }
}

pub struct FailingPredictor;

impl Predictor for FailingPredictor {
    fn evaluate(&mut self, _features: &[BoardFeatures]) -> Result<Inference> {
        Err(MctsError::Predictor("predictor offline".to_string()))
    }
}

/// Remembers the size of every batch the player reports.
#[derive(Default, Clone)]
pub struct RecordingObserver {
    sizes: Rc<RefCell<Vec<usize>>>,
}

impl RecordingObserver {
    pub fn callback(&self) -> impl FnMut(&Tree<PlacementPosition>, &[NodeId]) + 'static {
        let sizes = Rc::clone(&self.sizes);
        move |_tree: &Tree<PlacementPosition>, leaves: &[NodeId]| {
            sizes.borrow_mut().push(leaves.len())
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.sizes.borrow().clone()
    }
}
