//! Search tree.
//!
//! [`SearchTree`] is the capability set the player drives; [`Tree`] is the
//! arena-backed implementation. Nodes are addressed by [`NodeId`] and freed
//! slots are recycled when subtrees are pruned.

use crate::game::coord::{Move, MAX_MOVES, NUM_MOVES, PASS_INDEX};
use crate::game::position::Position;
use crate::mcts::node::{EdgeStats, MctsNode, NodeId};
use crate::mcts::selection::{child_action_score, child_u, select_child};
use std::fmt::Write;

pub trait SearchTree {
    type Position: Position;

    /// First node of the game; never pruned.
    fn game_root(&self) -> NodeId;
    /// Discards every node and starts over from `position`.
    fn reset(&mut self, position: Self::Position);

    fn parent(&self, id: NodeId) -> Option<NodeId>;
    fn incoming_move(&self, id: NodeId) -> Option<Move>;
    fn position(&self, id: NodeId) -> &Self::Position;
    /// `id`'s position followed by up to `n - 1` predecessors.
    fn move_history(&self, id: NodeId, n: usize) -> Vec<&Self::Position>;

    /// Descends from `root` to a node that still needs an evaluation.
    fn select_leaf(&mut self, root: NodeId) -> NodeId;
    fn incorporate_results(
        &mut self,
        leaf: NodeId,
        value_init_penalty: f32,
        policy: &[f32],
        value: f32,
        up_to: NodeId,
    );
    fn incorporate_end_game_result(&mut self, leaf: NodeId, value: f32, up_to: NodeId);
    fn add_virtual_loss(&mut self, leaf: NodeId, up_to: NodeId);
    fn revert_virtual_loss(&mut self, leaf: NodeId, up_to: NodeId);
    fn num_virtual_losses(&self, id: NodeId) -> u32;

    fn maybe_add_child(&mut self, id: NodeId, mv: Move) -> NodeId;
    /// Frees every child subtree except the one reached by `keep`.
    fn prune_children(&mut self, id: NodeId, keep: Move);
    fn clear_children(&mut self, id: NodeId);
    /// Forgets the search below `id` without touching its own statistics.
    fn reset_node(&mut self, id: NodeId);

    fn most_visited_move(&self, id: NodeId) -> Move;
    fn child_visits(&self, id: NodeId, index: usize) -> u32;
    fn visit_count(&self, id: NodeId) -> u32;
    /// Mean value, black's perspective.
    fn value_estimate(&self, id: NodeId) -> f32;
    /// Mean value from the perspective of the side to move.
    fn perspective_value(&self, id: NodeId) -> f32;
    fn inject_noise(&mut self, id: NodeId, noise: &[f32], mix: f32);
    fn is_expanded(&self, id: NodeId) -> bool;
    fn is_game_over(&self, id: NodeId) -> bool;
    fn at_move_limit(&self, id: NodeId) -> bool;
    fn describe(&self, id: NodeId) -> String;
}

pub struct Tree<P> {
    nodes: Vec<Option<MctsNode<P>>>,
    free: Vec<NodeId>,
    game_root: NodeId,
    root_stats: EdgeStats,
}

impl<P: Position> Tree<P> {
    pub fn new(position: P) -> Self {
        Self {
            nodes: vec![Some(MctsNode::new(position, None, None))],
            free: Vec::new(),
            game_root: 0,
            root_stats: EdgeStats::default(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: NodeId) -> &MctsNode<P> {
        match self.nodes.get(id as usize) {
            Some(Some(node)) => node,
            _ => panic!("node {} is not live", id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut MctsNode<P> {
        match self.nodes.get_mut(id as usize) {
            Some(Some(node)) => node,
            _ => panic!("node {} is not live", id),
        }
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id as usize), Some(Some(_)))
    }

    /// The edge holding `id`'s own statistics.
    fn stats(&self, id: NodeId) -> &EdgeStats {
        let node = self.node(id);
        match (node.parent, node.mv.and_then(Move::index)) {
            (Some(parent), Some(index)) => &self.node(parent).edges[index],
            _ => &self.root_stats,
        }
    }

    fn stats_mut(&mut self, id: NodeId) -> &mut EdgeStats {
        let node = self.node(id);
        match (node.parent, node.mv.and_then(Move::index)) {
            (Some(parent), Some(index)) => &mut self.node_mut(parent).edges[index],
            _ => &mut self.root_stats,
        }
    }

    fn alloc(&mut self, node: MctsNode<P>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id as usize] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                (self.nodes.len() - 1) as NodeId
            }
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes[next as usize].take() {
                stack.extend(node.children.values().copied());
                self.free.push(next);
            }
        }
    }

    /// Walks from `leaf` to `up_to` (inclusive), calling `f` on each node.
    fn walk_to(&mut self, leaf: NodeId, up_to: NodeId, mut f: impl FnMut(&mut Self, NodeId)) {
        let mut id = leaf;
        loop {
            f(self, id);
            if id == up_to {
                break;
            }
            match self.node(id).parent {
                Some(parent) => id = parent,
                None => panic!("node {} is not below batch root {}", leaf, up_to),
            }
        }
    }

    fn backup_value(&mut self, leaf: NodeId, value: f32, up_to: NodeId) {
        self.walk_to(leaf, up_to, |tree, id| {
            let stats = tree.stats_mut(id);
            stats.w += value;
            stats.n += 1;
        });
    }
}

impl<P: Position> SearchTree for Tree<P> {
    type Position = P;

    fn game_root(&self) -> NodeId {
        self.game_root
    }

    fn reset(&mut self, position: P) {
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(Some(MctsNode::new(position, None, None)));
        self.game_root = 0;
        self.root_stats = EdgeStats::default();
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    fn incoming_move(&self, id: NodeId) -> Option<Move> {
        self.node(id).mv
    }

    fn position(&self, id: NodeId) -> &P {
        &self.node(id).position
    }

    fn move_history(&self, id: NodeId, n: usize) -> Vec<&P> {
        let mut history = Vec::with_capacity(n);
        let mut current = Some(id);
        while let Some(node_id) = current {
            if history.len() == n {
                break;
            }
            let node = self.node(node_id);
            history.push(&node.position);
            current = node.parent;
        }
        history
    }

    fn select_leaf(&mut self, root: NodeId) -> NodeId {
        let mut id = root;
        loop {
            let node = self.node(id);
            // Without an evaluation there is no basis for choosing a child.
            if !node.is_expanded {
                break;
            }
            // After a pass, look at the double pass first so the search notices
            // when passing ends the game.
            if node.mv == Some(Move::Pass) && node.child_n(PASS_INDEX) == 0 {
                id = self.maybe_add_child(id, Move::Pass);
                continue;
            }
            let index = select_child(node, self.stats(id).n);
            id = self.maybe_add_child(id, Move::from_index(index));
        }
        id
    }

    fn incorporate_results(
        &mut self,
        leaf: NodeId,
        value_init_penalty: f32,
        policy: &[f32],
        value: f32,
        up_to: NodeId,
    ) {
        assert_eq!(policy.len(), NUM_MOVES, "policy must cover the move space");
        let node = self.node_mut(leaf);
        debug_assert!(!node.position.is_game_over(), "terminal leaves take the end-game path");

        // The same leaf can appear twice in one batch; only the first result
        // expands it.
        if node.is_expanded {
            return;
        }

        node.legal = (0..NUM_MOVES)
            .map(|i| node.position.is_legal(Move::from_index(i)))
            .collect();
        let legal_mass: f32 = policy
            .iter()
            .zip(&node.legal)
            .filter(|(_, legal)| **legal)
            .map(|(p, _)| *p)
            .sum();
        let scale = if legal_mass > f32::MIN_POSITIVE {
            1.0 / legal_mass
        } else {
            0.0
        };

        let reduction = value_init_penalty * node.position.to_play().sign();
        let reduced_value = (value - reduction).clamp(-1.0, 1.0);

        for (i, edge) in node.edges.iter_mut().enumerate() {
            let prior = if node.legal[i] { policy[i] * scale } else { 0.0 };
            *edge = EdgeStats {
                n: 0,
                w: reduced_value,
                p: prior,
                original_p: prior,
            };
        }
        node.is_expanded = true;

        self.backup_value(leaf, value, up_to);
    }

    fn incorporate_end_game_result(&mut self, leaf: NodeId, value: f32, up_to: NodeId) {
        debug_assert!(self.is_game_over(leaf) || self.at_move_limit(leaf));
        self.backup_value(leaf, value, up_to);
    }

    fn add_virtual_loss(&mut self, leaf: NodeId, up_to: NodeId) {
        self.walk_to(leaf, up_to, |tree, id| {
            let node = tree.node_mut(id);
            node.num_virtual_losses_applied += 1;
            // Pessimistic for the player who moved into this node.
            let loss = node.position.to_play().sign();
            tree.stats_mut(id).w += loss;
        });
    }

    fn revert_virtual_loss(&mut self, leaf: NodeId, up_to: NodeId) {
        self.walk_to(leaf, up_to, |tree, id| {
            let node = tree.node_mut(id);
            assert!(
                node.num_virtual_losses_applied > 0,
                "reverting a virtual loss that was never applied"
            );
            node.num_virtual_losses_applied -= 1;
            let loss = node.position.to_play().sign();
            tree.stats_mut(id).w -= loss;
        });
    }

    fn num_virtual_losses(&self, id: NodeId) -> u32 {
        self.node(id).num_virtual_losses_applied
    }

    fn maybe_add_child(&mut self, id: NodeId, mv: Move) -> NodeId {
        let Some(index) = mv.index() else {
            panic!("{} has no node in the tree", mv);
        };
        if let Some(&child) = self.node(id).children.get(&index) {
            return child;
        }
        let position = self.node(id).position.play(mv);
        let child = self.alloc(MctsNode::new(position, Some(mv), Some(id)));
        self.node_mut(id).children.insert(index, child);
        child
    }

    fn prune_children(&mut self, id: NodeId, keep: Move) {
        let keep_index = keep.index();
        let doomed: Vec<NodeId> = self
            .node(id)
            .children
            .iter()
            .filter(|(index, _)| Some(**index) != keep_index)
            .map(|(_, child)| *child)
            .collect();
        self.node_mut(id)
            .children
            .retain(|index, _| Some(*index) == keep_index);
        for child in doomed {
            self.free_subtree(child);
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.node_mut(id).children.drain().map(|(_, c)| c).collect();
        for child in children {
            self.free_subtree(child);
        }
    }

    fn reset_node(&mut self, id: NodeId) {
        self.clear_children(id);
        self.node_mut(id).reset_search();
    }

    fn most_visited_move(&self, id: NodeId) -> Move {
        let node = self.node(id);
        let mut best = 0;
        for index in 1..NUM_MOVES {
            let (n, best_n) = (node.edges[index].n, node.edges[best].n);
            if n > best_n || (n == best_n && node.edges[index].p > node.edges[best].p) {
                best = index;
            }
        }
        Move::from_index(best)
    }

    fn child_visits(&self, id: NodeId, index: usize) -> u32 {
        self.node(id).child_n(index)
    }

    fn visit_count(&self, id: NodeId) -> u32 {
        self.stats(id).n
    }

    fn value_estimate(&self, id: NodeId) -> f32 {
        self.stats(id).q()
    }

    fn perspective_value(&self, id: NodeId) -> f32 {
        self.value_estimate(id) * self.position(id).to_play().sign()
    }

    fn inject_noise(&mut self, id: NodeId, noise: &[f32], mix: f32) {
        assert_eq!(noise.len(), NUM_MOVES);
        for (edge, &eta) in self.node_mut(id).edges.iter_mut().zip(noise) {
            edge.p = (1.0 - mix) * edge.p + mix * eta;
        }
    }

    fn is_expanded(&self, id: NodeId) -> bool {
        self.node(id).is_expanded
    }

    fn is_game_over(&self, id: NodeId) -> bool {
        self.position(id).is_game_over()
    }

    fn at_move_limit(&self, id: NodeId) -> bool {
        self.position(id).move_number() >= MAX_MOVES
    }

    fn describe(&self, id: NodeId) -> String {
        let node = self.node(id);
        let n = self.stats(id).n;
        let mut out = String::new();
        let _ = writeln!(out, "Q: {:.5} N: {}", self.value_estimate(id), n);
        let _ = writeln!(out, "move : action      Q      U      P  P-orig      N");

        let mut order: Vec<usize> = (0..NUM_MOVES).collect();
        order.sort_by(|&a, &b| {
            node.edges[b].n.cmp(&node.edges[a].n).then_with(|| {
                child_action_score(node, n, b).total_cmp(&child_action_score(node, n, a))
            })
        });
        for &index in order.iter().take(10) {
            let edge = &node.edges[index];
            let _ = writeln!(
                out,
                "{:>4} : {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:>7.4} {:>6}",
                Move::from_index(index).to_string(),
                child_action_score(node, n, index),
                edge.q(),
                child_u(node, n, index),
                edge.p,
                edge.original_p,
                edge.n
            );
        }
        out
    }
}
