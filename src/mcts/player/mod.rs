//! MCTS player.
//!
//! [`MctsPlayer`] owns the search tree, the predictor handle, the optional
//! shared inference cache and the game history. A move cycle is:
//!
//! 1. [`MctsPlayer::suggest_move`] runs search rounds (leaf selection, then
//!    one batched evaluation) until the readout or time budget is spent, and
//!    picks a move.
//! 2. [`MctsPlayer::play_move`] records the search statistics and advances the
//!    root.
//!
//! Everything runs on the caller's thread. Virtual losses only spread the
//! leaves of one batch over different subtrees.

mod batch_evaluation;
mod leaf_selection;
mod play_move;
mod search;

use crate::mcts::move_selection::soft_pick_cutoff;
use crate::mcts::node::NodeId;
use crate::mcts::options::Options;
use crate::mcts::provenance::{InferenceLog, InferenceRecord};
use crate::mcts::tree::SearchTree;
use crate::neural::features::BoardFeatures;
use crate::neural::inference_cache::InferenceCache;
use crate::neural::predictor::Predictor;
use crate::neural::symmetry::Symmetry;
use crate::recording::game_history::GameHistory;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Observer called with every evaluated batch of leaves. It only gets a
/// shared reference to the tree.
pub type TreeSearchCallback<T> = Box<dyn FnMut(&T, &[NodeId])>;

pub struct MctsPlayer<T: SearchTree, G: GameHistory> {
    tree: T,
    root: NodeId,
    initial_position: T::Position,
    predictor: Box<dyn Predictor>,
    cache: Option<Arc<dyn InferenceCache>>,
    game: G,
    options: Options,
    temperature_cutoff: Option<usize>,
    rng: StdRng,
    inferences: InferenceLog,
    callback: Option<TreeSearchCallback<T>>,

    // Scratch buffers reused across rounds.
    leaves: Vec<NodeId>,
    symmetries: Vec<Symmetry>,
    features: Vec<BoardFeatures>,
}

impl<T: SearchTree, G: GameHistory> MctsPlayer<T, G> {
    /// Builds a player around `tree`, whose current game root becomes the
    /// starting position of every new game.
    pub fn new(
        tree: T,
        predictor: Box<dyn Predictor>,
        cache: Option<Arc<dyn InferenceCache>>,
        game: G,
        options: Options,
    ) -> Result<Self> {
        options.validate()?;
        log::debug!("MctsPlayer options:{}", options);
        log::debug!("Game options:{}", game.options());

        let rng = if options.random_seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(options.random_seed)
        };
        let initial_position = tree.position(tree.game_root()).clone();
        let root = tree.game_root();

        let mut player = Self {
            tree,
            root,
            initial_position,
            predictor,
            cache,
            game,
            temperature_cutoff: soft_pick_cutoff(options.soft_pick),
            options,
            rng,
            inferences: InferenceLog::new(),
            callback: None,
            leaves: Vec::new(),
            symmetries: Vec::new(),
            features: Vec::new(),
        };
        player.new_game();
        Ok(player)
    }

    /// Starts a game from `position`, discarding the whole tree.
    ///
    /// The inference log is kept.
    pub fn initialize_game(&mut self, position: T::Position) {
        self.tree.reset(position);
        self.root = self.tree.game_root();
        self.game.new_game();
    }

    pub fn new_game(&mut self) {
        self.initialize_game(self.initial_position.clone());
    }

    /// Steps back one move. Returns false at the start of the game.
    pub fn undo_move(&mut self) -> bool {
        let Some(parent) = self.tree.parent(self.root) else {
            return false;
        };
        self.root = parent;
        self.game.undo_move();
        if !self.options.tree_reuse {
            self.tree.reset_node(self.root);
        }
        true
    }

    pub fn set_tree_search_callback(&mut self, callback: impl FnMut(&T, &[NodeId]) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// `"model(first,last), ..."` for every model that served inference.
    pub fn models_used_for_inference(&self) -> String {
        self.inferences.summary()
    }

    pub fn inferences(&self) -> &[InferenceRecord] {
        self.inferences.records()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Move number from which moves are always the most visited child.
    /// `None` when soft-pick is disabled (every move is deterministic).
    pub fn temperature_cutoff(&self) -> Option<usize> {
        self.temperature_cutoff
    }

    pub fn predictor_mut(&mut self) -> &mut dyn Predictor {
        self.predictor.as_mut()
    }
}
