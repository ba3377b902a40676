use super::MctsPlayer;
use crate::game::position::Position;
use crate::mcts::node::NodeId;
use crate::mcts::tree::SearchTree;
use crate::neural::inference_cache::CacheKey;
use crate::recording::game_history::GameHistory;

impl<T: SearchTree, G: GameHistory> MctsPlayer<T, G> {
    /// Collects up to `num_leaves` leaves below `root` into `leaves`, each
    /// carrying one virtual loss.
    ///
    /// Terminal leaves are scored on the spot and cached leaves take their
    /// stored evaluation; neither occupies a batch slot. Terminal leaves and
    /// batched leaves count towards a bound of `2 * num_leaves` selections so
    /// small or finished subtrees cannot keep the loop spinning.
    pub(super) fn select_leaves(&mut self, root: NodeId, num_leaves: usize, leaves: &mut Vec<NodeId>) {
        leaves.clear();
        let max_misses = num_leaves * 2;
        let mut num_misses = 0;
        let mut num_hits = 0;

        while num_misses < max_misses {
            let leaf = self.tree.select_leaf(root);

            if self.tree.is_game_over(leaf) || self.tree.at_move_limit(leaf) {
                let score = self
                    .tree
                    .position(leaf)
                    .calculate_score(self.game.options().komi);
                let value = if score > 0.0 { 1.0 } else { -1.0 };
                self.tree.incorporate_end_game_result(leaf, value, root);
                num_misses += 1;
                continue;
            }

            if let Some(cache) = &self.cache {
                let key = CacheKey::new(self.tree.incoming_move(leaf), self.tree.position(leaf));
                if let Some(output) = cache.try_get(&key) {
                    num_hits += 1;
                    self.tree.incorporate_results(
                        leaf,
                        self.options.value_init_penalty,
                        &output.policy,
                        output.value,
                        root,
                    );
                    continue;
                }
            }

            num_misses += 1;
            self.tree.add_virtual_loss(leaf, root);
            leaves.push(leaf);
            // A leaf root means there is nothing else to find.
            if leaves.len() == num_leaves || leaf == root {
                break;
            }
        }

        if num_hits > 0 {
            log::trace!("select_leaves: {} batched, {} cache hits", leaves.len(), num_hits);
        }
    }
}
