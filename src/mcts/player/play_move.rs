use super::MctsPlayer;
use crate::game::coord::Move;
use crate::game::position::Position;
use crate::mcts::move_selection::search_pi;
use crate::mcts::tree::SearchTree;
use crate::recording::game_history::GameHistory;
use crate::recording::game_record::MoveRecord;
use crate::{MctsError, Result};

impl<T: SearchTree, G: GameHistory> MctsPlayer<T, G> {
    /// Commits `mv` for the side to move.
    ///
    /// Fails without touching the tree when the game is already over or the
    /// move is illegal. A resignation only ends the game.
    pub fn play_move(&mut self, mv: Move) -> Result<()> {
        if self.tree.is_game_over(self.root) || self.game.is_game_over() {
            log::error!("Can't play move {}, game is over", mv);
            return Err(MctsError::GameOver { mv });
        }

        if mv == Move::Resign {
            let winner = self.tree.position(self.root).to_play().other();
            self.game.set_game_over_because_of_resign(winner);
            return Ok(());
        }

        if !self.tree.position(self.root).is_legal(mv) {
            log::error!("Move {} is illegal", mv);
            log::error!("MctsPlayer options:{}", self.options);
            log::error!("Game options:{}", self.game.options());
            for i in 0..self.game.num_moves() {
                if let Some(record) = self.game.get_move(i) {
                    log::error!("{}  {}", record.color, record.mv);
                }
            }
            return Err(MctsError::IllegalMove { mv });
        }

        self.update_game(mv);

        let old_root = self.root;
        if self.options.tree_reuse {
            self.root = self.tree.maybe_add_child(old_root, mv);
            // Siblings of the played move are never revisited in normal play.
            if self.options.prune_orphaned_nodes {
                self.tree.prune_children(old_root, mv);
            }
        } else {
            self.tree.clear_children(old_root);
            self.root = self.tree.maybe_add_child(old_root, mv);
        }

        let komi = self.game.options().komi;
        if self.tree.at_move_limit(self.root) {
            let score = self.tree.position(self.root).calculate_score(komi);
            self.game.set_game_over_because_move_limit_reached(score);
        } else if self.tree.is_game_over(self.root) {
            let score = self.tree.position(self.root).calculate_score(komi);
            self.game.set_game_over_because_of_passes(score);
        }
        Ok(())
    }

    /// Forwards the root's search statistics for `mv` to the game history.
    fn update_game(&mut self, mv: Move) {
        let position = self.tree.position(self.root);
        let models = self.inferences.models_for_move(position.move_number());

        let mut comment = self.tree.describe(self.root);
        if !models.is_empty() {
            comment = format!("models:{}\n{}", models.join(","), comment);
        }

        let record = MoveRecord {
            color: position.to_play(),
            mv,
            stones: position.stones().to_vec(),
            comment,
            q: self.tree.value_estimate(self.root),
            search_pi: search_pi(
                &self.tree,
                self.root,
                self.temperature_cutoff,
                self.options.policy_softmax_temp,
            ),
            models,
            timestamp: chrono::Utc::now().timestamp(),
        };
        self.game.add_move(record);
    }
}
