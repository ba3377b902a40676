//! PUCT child selection.
//!
//! Formula: `Q * sign(to_play) + U`, with
//! `U = c_puct(N) * P * sqrt(max(1, N - 1)) / (1 + N_child)` and
//! `c_puct(N) = ln((1 + N + base) / base) + init`.
//! Illegal moves are pushed far below every legal one.

use crate::game::coord::NUM_MOVES;
use crate::game::position::Position;
use crate::mcts::node::MctsNode;

pub const PUCT_BASE: f32 = 19652.0;
pub const PUCT_INIT: f32 = 1.25;
const ILLEGAL_PENALTY: f32 = 1000.0;

pub fn c_puct(parent_n: u32) -> f32 {
    ((1.0 + parent_n as f32 + PUCT_BASE) / PUCT_BASE).ln() + PUCT_INIT
}

pub fn child_u<P: Position>(node: &MctsNode<P>, parent_n: u32, index: usize) -> f32 {
    let edge = &node.edges[index];
    let visits = (parent_n as f32 - 1.0).max(1.0);
    c_puct(parent_n) * edge.p * visits.sqrt() / (1.0 + edge.n as f32)
}

pub fn child_action_score<P: Position>(node: &MctsNode<P>, parent_n: u32, index: usize) -> f32 {
    let sign = node.position.to_play().sign();
    let illegal = if node.is_legal(index) { 0.0 } else { ILLEGAL_PENALTY };
    node.child_q(index) * sign + child_u(node, parent_n, index) - illegal
}

/// Index of the child with the highest action score; the first one wins ties.
pub fn select_child<P: Position>(node: &MctsNode<P>, parent_n: u32) -> usize {
    let mut best_index = 0;
    let mut best_score = f32::NEG_INFINITY;
    for index in 0..NUM_MOVES {
        let score = child_action_score(node, parent_n, index);
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }
    best_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::coord::{Move, PASS_INDEX};
    use crate::test_support::PlacementPosition;

    fn expanded_node(priors: &[(usize, f32)]) -> MctsNode<PlacementPosition> {
        let mut node = MctsNode::new(PlacementPosition::new(), None, None);
        node.is_expanded = true;
        node.legal = (0..NUM_MOVES)
            .map(|i| node.position.is_legal(Move::from_index(i)))
            .collect();
        for &(index, p) in priors {
            node.edges[index].p = p;
        }
        node
    }

    #[test]
    fn test_c_puct_grows_with_visits() {
        assert!((c_puct(0) - PUCT_INIT).abs() < 1e-4);
        assert!(c_puct(100_000) > c_puct(100));
    }

    #[test]
    fn test_highest_prior_wins_when_unvisited() {
        let node = expanded_node(&[(10, 0.2), (20, 0.7), (PASS_INDEX, 0.1)]);
        assert_eq!(select_child(&node, 1), 20);
    }

    #[test]
    fn test_value_flips_with_side_to_move() {
        // Black to move: the child with the higher black value is preferred.
        let mut node = expanded_node(&[]);
        node.edges[1].w = 0.9;
        node.edges[2].w = -0.9;
        assert_eq!(select_child(&node, 1), 1);

        let mut white = expanded_node(&[]);
        white.position = white.position.play(Move::Point(40));
        white.legal[40] = false;
        white.edges[1].w = 0.9;
        white.edges[2].w = -0.9;
        assert_eq!(select_child(&white, 1), 2);
    }

    #[test]
    fn test_illegal_moves_are_never_preferred() {
        let mut node = expanded_node(&[(5, 1.0)]);
        node.legal[5] = false;
        assert_ne!(select_child(&node, 10), 5);
    }
}
