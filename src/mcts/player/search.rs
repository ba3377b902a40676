use super::MctsPlayer;
use crate::game::coord::{Move, NUM_MOVES};
use crate::game::position::Position;
use crate::mcts::move_selection::pick_move;
use crate::mcts::time_budget::time_recommendation;
use crate::mcts::tree::SearchTree;
use crate::recording::game_history::GameHistory;
use crate::{MctsError, Result};
use rand::Rng;
use rand_distr::{Distribution, Gamma};
use std::time::{Duration, Instant};

impl<T: SearchTree, G: GameHistory> MctsPlayer<T, G> {
    /// One search round: a batch of `virtual_losses` leaves evaluated in a
    /// single predictor call.
    pub fn tree_search(&mut self) -> Result<()> {
        let mut leaves = std::mem::take(&mut self.leaves);
        self.select_leaves(self.root, self.options.virtual_losses, &mut leaves);
        let result = self.process_leaves(&leaves, self.options.random_symmetry);
        self.leaves = leaves;
        result
    }

    /// Searches from the current root and returns the move to play, or
    /// [`Move::Resign`] when the position is judged lost.
    ///
    /// With a time budget the search runs until it is spent, otherwise until
    /// the root has `new_readouts` more visits. Rounds are never interrupted,
    /// so both limits can be overshot by up to one round.
    pub fn suggest_move(&mut self, new_readouts: u32, inject_noise: bool) -> Result<Move> {
        let start = Instant::now();

        // Readouts are counted on the root, which therefore has to be
        // expanded first.
        if !self.tree.is_expanded(self.root) {
            let mut leaves = std::mem::take(&mut self.leaves);
            self.select_leaves(self.root, 1, &mut leaves);
            let result = self.process_leaves(&leaves, self.options.random_symmetry);
            self.leaves = leaves;
            result?;
        }

        if inject_noise {
            if let Some(noise) = sample_dirichlet(self.options.dirichlet_alpha, &mut self.rng)? {
                self.tree.inject_noise(self.root, &noise, self.options.noise_mix);
            }
        }

        let current_readouts = self.tree.visit_count(self.root);
        if self.options.seconds_per_move > 0.0 {
            let mut seconds = self.options.seconds_per_move;
            if self.options.time_limit > 0.0 {
                seconds = time_recommendation(
                    self.tree.position(self.root).move_number(),
                    seconds,
                    self.options.time_limit,
                    self.options.decay_factor,
                );
            }
            let budget = Duration::from_secs_f64(seconds.max(0.0));
            while start.elapsed() < budget {
                self.tree_search()?;
            }
        } else {
            let target = current_readouts + new_readouts;
            while self.tree.visit_count(self.root) < target {
                self.tree_search()?;
            }
        }

        let readouts = self.tree.visit_count(self.root) - current_readouts;
        if self.should_resign() {
            log::info!(
                "Resigning at move {} (value {:.3} after {} readouts)",
                self.tree.position(self.root).move_number(),
                self.tree.perspective_value(self.root),
                readouts
            );
            return Ok(Move::Resign);
        }

        let mv = pick_move(
            &self.tree,
            self.root,
            self.temperature_cutoff,
            self.options.policy_softmax_temp,
            &mut self.rng,
        );
        log::info!(
            "Move {}: {} after {} readouts in {:.2}s (Q {:.3})",
            self.tree.position(self.root).move_number(),
            mv,
            readouts,
            start.elapsed().as_secs_f32(),
            self.tree.value_estimate(self.root)
        );
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", self.tree.describe(self.root));
        }
        Ok(mv)
    }

    /// True when resignation is enabled and the root value for the side to
    /// move is below the game's threshold.
    pub fn should_resign(&self) -> bool {
        let options = self.game.options();
        options.resign_enabled && self.tree.perspective_value(self.root) < options.resign_threshold
    }

    /// Self-play step: search, then play the suggested move.
    ///
    /// With probability `fastplay_frequency` the search is a cheap
    /// `fastplay_readouts` search without noise.
    pub fn play_search_move(&mut self) -> Result<Move> {
        let fastplay = self.options.fastplay_frequency > 0.0
            && self.rng.random::<f32>() < self.options.fastplay_frequency;
        let (readouts, inject_noise) = if fastplay {
            (self.options.fastplay_readouts, false)
        } else {
            (self.options.num_readouts, self.options.inject_noise)
        };
        let mv = self.suggest_move(readouts, inject_noise)?;
        self.play_move(mv)?;
        Ok(mv)
    }
}

/// Dirichlet sample over the move space, built from normalised Gamma draws.
/// `None` when every draw underflowed.
fn sample_dirichlet<R: Rng>(alpha: f32, rng: &mut R) -> Result<Option<Vec<f32>>> {
    let gamma = Gamma::new(alpha as f64, 1.0)
        .map_err(|e| MctsError::InvalidOptions(format!("dirichlet_alpha {}: {}", alpha, e)))?;
    let draws: Vec<f64> = (0..NUM_MOVES).map(|_| gamma.sample(rng)).collect();
    let sum: f64 = draws.iter().sum();
    if !(sum.is_finite() && sum > 0.0) {
        return Ok(None);
    }
    Ok(Some(draws.iter().map(|x| (x / sum) as f32).collect()))
}
