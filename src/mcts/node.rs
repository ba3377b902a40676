//! Node storage for the search tree.
//!
//! Visit statistics of a node live on the edge that leads to it: a child's
//! `N`/`W` are `parent.edges[move]`. The game root has no incoming edge and
//! keeps its statistics in the tree's root slot.

use crate::game::coord::{Move, NUM_MOVES};
use crate::game::position::Position;
use std::collections::HashMap;

pub type NodeId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeStats {
    /// Visit count.
    pub n: u32,
    /// Total backed-up value, black's perspective.
    pub w: f32,
    /// Prior, possibly with root noise mixed in.
    pub p: f32,
    /// Prior exactly as the predictor produced it (renormalised).
    pub original_p: f32,
}

impl EdgeStats {
    /// Mean value. The denominator counts the initial value seeded into `w`.
    pub fn q(&self) -> f32 {
        self.w / (1.0 + self.n as f32)
    }
}

#[derive(Debug, Clone)]
pub struct MctsNode<P> {
    /// Move that led here; `None` for the game root.
    pub mv: Option<Move>,
    pub parent: Option<NodeId>,
    pub position: P,
    pub is_expanded: bool,
    pub num_virtual_losses_applied: u32,
    /// Legal-move mask, filled in on expansion.
    pub legal: Vec<bool>,
    pub edges: Vec<EdgeStats>,
    /// Materialised children keyed by move index.
    pub children: HashMap<usize, NodeId>,
}

impl<P: Position> MctsNode<P> {
    pub fn new(position: P, mv: Option<Move>, parent: Option<NodeId>) -> Self {
        Self {
            mv,
            parent,
            position,
            is_expanded: false,
            num_virtual_losses_applied: 0,
            legal: Vec::new(),
            edges: vec![EdgeStats::default(); NUM_MOVES],
            children: HashMap::new(),
        }
    }

    /// Drops search results but keeps the node's place in the tree.
    pub fn reset_search(&mut self) {
        self.is_expanded = false;
        self.num_virtual_losses_applied = 0;
        self.legal.clear();
        self.edges.iter_mut().for_each(|e| *e = EdgeStats::default());
        self.children.clear();
    }

    pub fn is_legal(&self, index: usize) -> bool {
        match self.legal.get(index) {
            Some(&legal) => legal,
            None => self.position.is_legal(Move::from_index(index)),
        }
    }

    pub fn child_n(&self, index: usize) -> u32 {
        self.edges[index].n
    }

    pub fn child_q(&self, index: usize) -> f32 {
        self.edges[index].q()
    }
}
