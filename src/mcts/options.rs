//! Player options.
//!
//! Fixed at construction and never mutated afterwards. Partial JSON documents
//! are accepted; missing fields take the defaults below.

use crate::game::coord::NUM_POINTS;
use crate::{MctsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Mix Dirichlet noise into the root priors before searching.
    pub inject_noise: bool,

    /// Sample early moves proportionally to visit counts instead of always
    /// taking the most visited one.
    pub soft_pick: bool,

    /// Apply a random board symmetry to every inference.
    pub random_symmetry: bool,

    /// Unvisited children start with the parent value reduced by this amount
    /// (towards a loss for the side to move).
    pub value_init_penalty: f32,

    /// Exponent applied to visit counts before soft-picking.
    pub policy_softmax_temp: f32,

    /// Leaves gathered per search round, i.e. the inference batch size.
    pub virtual_losses: usize,

    /// Readouts per move for full searches.
    pub num_readouts: u32,

    /// Search by wall clock instead of readouts when positive.
    pub seconds_per_move: f64,

    /// Total thinking time per game. When positive, the per-move budget is
    /// recomputed from the move number.
    pub time_limit: f64,

    /// Per-move decay of the thinking time once the core moves are used up.
    pub decay_factor: f64,

    /// Probability of a fast (cheap, noise-free) search in self-play.
    pub fastplay_frequency: f32,
    pub fastplay_readouts: u32,

    /// Weight of the Dirichlet sample when mixed into the root priors.
    pub noise_mix: f32,
    pub dirichlet_alpha: f32,

    /// Keep the searched subtree of the played move.
    pub tree_reuse: bool,

    /// Drop the siblings of the played move when reusing the tree.
    pub prune_orphaned_nodes: bool,

    /// 0 draws a seed from the operating system.
    pub random_seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            inject_noise: true,
            soft_pick: true,
            random_symmetry: true,
            value_init_penalty: 2.0,
            policy_softmax_temp: 0.98,
            virtual_losses: 8,
            num_readouts: 100,
            seconds_per_move: 0.0,
            time_limit: 0.0,
            decay_factor: 0.98,
            fastplay_frequency: 0.0,
            fastplay_readouts: 20,
            noise_mix: 0.25,
            // 0.03 on 19x19, scaled by board area.
            dirichlet_alpha: 0.03 * 361.0 / NUM_POINTS as f32,
            tree_reuse: true,
            prune_orphaned_nodes: true,
            random_seed: 0,
        }
    }
}

fn invalid(msg: String) -> MctsError {
    MctsError::InvalidOptions(msg)
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.virtual_losses == 0 {
            return Err(invalid("virtual_losses must be > 0".to_string()));
        }
        if !(self.policy_softmax_temp.is_finite() && self.policy_softmax_temp > 0.0) {
            return Err(invalid(format!(
                "policy_softmax_temp must be finite and > 0, got {}",
                self.policy_softmax_temp
            )));
        }
        if !self.value_init_penalty.is_finite() {
            return Err(invalid("value_init_penalty must be finite".to_string()));
        }
        if !(self.seconds_per_move.is_finite() && self.seconds_per_move >= 0.0) {
            return Err(invalid(format!(
                "seconds_per_move must be >= 0, got {}",
                self.seconds_per_move
            )));
        }
        if !(self.time_limit.is_finite() && self.time_limit >= 0.0) {
            return Err(invalid(format!("time_limit must be >= 0, got {}", self.time_limit)));
        }
        if !(0.0..1.0).contains(&self.decay_factor) {
            return Err(invalid(format!(
                "decay_factor must be in [0, 1), got {}",
                self.decay_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.fastplay_frequency) {
            return Err(invalid(format!(
                "fastplay_frequency must be in [0, 1], got {}",
                self.fastplay_frequency
            )));
        }
        if !(0.0..=1.0).contains(&self.noise_mix) {
            return Err(invalid(format!("noise_mix must be in [0, 1], got {}", self.noise_mix)));
        }
        if !(self.dirichlet_alpha.is_finite() && self.dirichlet_alpha > 0.0) {
            return Err(invalid(format!(
                "dirichlet_alpha must be finite and > 0, got {}",
                self.dirichlet_alpha
            )));
        }
        if self.seconds_per_move == 0.0 && self.num_readouts == 0 {
            log::warn!("num_readouts is 0 and no time budget is set: searches will only expand the root");
        }
        Ok(())
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " inject_noise:{} soft_pick:{} random_symmetry:{} value_init_penalty:{} \
             policy_softmax_temp:{} virtual_losses:{} num_readouts:{} seconds_per_move:{} \
             time_limit:{} decay_factor:{} fastplay_frequency:{} fastplay_readouts:{} \
             noise_mix:{} dirichlet_alpha:{} tree_reuse:{} prune_orphaned_nodes:{} random_seed:{}",
            self.inject_noise,
            self.soft_pick,
            self.random_symmetry,
            self.value_init_penalty,
            self.policy_softmax_temp,
            self.virtual_losses,
            self.num_readouts,
            self.seconds_per_move,
            self.time_limit,
            self.decay_factor,
            self.fastplay_frequency,
            self.fastplay_readouts,
            self.noise_mix,
            self.dirichlet_alpha,
            self.tree_reuse,
            self.prune_orphaned_nodes,
            self.random_seed
        )
    }
}
