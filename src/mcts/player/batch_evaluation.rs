use super::MctsPlayer;
use crate::game::coord::{NUM_MOVES, PASS_INDEX};
use crate::game::position::Position;
use crate::mcts::node::NodeId;
use crate::mcts::tree::SearchTree;
use crate::neural::features::{set_features, MOVE_HISTORY, NUM_STONE_FEATURES};
use crate::neural::inference_cache::CacheKey;
use crate::neural::predictor::ModelOutput;
use crate::neural::symmetry::Symmetry;
use crate::recording::game_history::GameHistory;
use crate::Result;

impl<T: SearchTree, G: GameHistory> MctsPlayer<T, G> {
    /// Evaluates `leaves` with one predictor call and backs the results up to
    /// the current root. Every leaf must carry a virtual loss, which is
    /// reverted here.
    pub(super) fn process_leaves(&mut self, leaves: &[NodeId], random_symmetry: bool) -> Result<()> {
        if leaves.is_empty() {
            return Ok(());
        }

        self.symmetries.clear();
        if random_symmetry {
            for _ in leaves {
                self.symmetries.push(Symmetry::random(&mut self.rng));
            }
        } else {
            self.symmetries.resize(leaves.len(), Symmetry::Identity);
        }

        self.features.clear();
        for (&leaf, &symmetry) in leaves.iter().zip(&self.symmetries) {
            assert!(
                self.tree.num_virtual_losses(leaf) > 0,
                "leaf {} reached evaluation without a virtual loss",
                leaf
            );
            let history = self.tree.move_history(leaf, MOVE_HISTORY);
            let raw = set_features(&history, self.tree.position(leaf).to_play());
            let mut transformed = vec![0.0; raw.len()];
            symmetry.apply(&raw, &mut transformed, NUM_STONE_FEATURES);
            self.features.push(transformed);
        }

        let inference = self.predictor.evaluate(&self.features)?;
        assert_eq!(
            inference.outputs.len(),
            leaves.len(),
            "predictor returned {} outputs for {} inputs",
            inference.outputs.len(),
            leaves.len()
        );

        if !inference.model.is_empty() {
            let move_number = self.tree.position(self.root).move_number();
            self.inferences.record(&inference.model, move_number, leaves.len());
        }

        let root = self.root;
        let mut normalized = ModelOutput {
            policy: vec![0.0; NUM_MOVES],
            value: 0.0,
        };
        for ((&leaf, &symmetry), output) in leaves.iter().zip(&self.symmetries).zip(&inference.outputs) {
            // Pass is not a board point, so it has no transform.
            symmetry
                .inverse()
                .apply(&output.policy, &mut normalized.policy, 1);
            normalized.policy[PASS_INDEX] = output.policy[PASS_INDEX];
            normalized.value = output.value;

            self.tree.incorporate_results(
                leaf,
                self.options.value_init_penalty,
                &normalized.policy,
                normalized.value,
                root,
            );

            if let Some(cache) = &self.cache {
                let key = CacheKey::new(self.tree.incoming_move(leaf), self.tree.position(leaf));
                cache.add(key, normalized.clone());
            }

            self.tree.revert_virtual_loss(leaf, root);
        }

        if let Some(callback) = self.callback.as_mut() {
            callback(&self.tree, leaves);
        }
        Ok(())
    }
}
