//! Batched policy/value predictor contract.

use crate::game::coord::NUM_MOVES;
use crate::neural::features::BoardFeatures;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Predictor output for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    /// Distribution over the full move space, pass last.
    pub policy: Vec<f32>,
    /// Expected outcome in [-1, 1] from black's perspective.
    pub value: f32,
}

impl ModelOutput {
    pub fn uniform(value: f32) -> Self {
        Self {
            policy: vec![1.0 / NUM_MOVES as f32; NUM_MOVES],
            value,
        }
    }
}

/// Result of one batched call.
#[derive(Debug, Clone, Default)]
pub struct Inference {
    /// One output per input, index-aligned.
    pub outputs: Vec<ModelOutput>,
    /// Identifier of the model that served the batch. Empty when unknown.
    pub model: String,
}

pub trait Predictor {
    /// Evaluates every feature tensor in one call. Must accept an empty batch.
    fn evaluate(&mut self, features: &[BoardFeatures]) -> Result<Inference>;
}

/// Uniform policy and a neutral value, for bootstrapping and tests.
pub struct UniformPredictor {
    model: String,
}

impl UniformPredictor {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

impl Default for UniformPredictor {
    fn default() -> Self {
        Self::new("uniform")
    }
}

impl Predictor for UniformPredictor {
    fn evaluate(&mut self, features: &[BoardFeatures]) -> Result<Inference> {
        Ok(Inference {
            outputs: features.iter().map(|_| ModelOutput::uniform(0.0)).collect(),
            model: self.model.clone(),
        })
    }
}
