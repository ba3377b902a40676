//! Monte Carlo Tree Search.
//!
//! # Components
//!
//! - `node` / `tree`: arena-backed search tree and the contract the player drives
//! - `selection`: PUCT child scoring
//! - `move_selection`: visit counts to a move, and the recorded distribution
//! - `time_budget`: per-move thinking time under a game clock
//! - `provenance`: which model served inference for which moves
//! - `options`: player configuration
//! - `player`: the search loop and move commitment

pub mod move_selection;
pub mod node;
pub mod options;
pub mod player;
pub mod provenance;
pub mod selection;
pub mod time_budget;
pub mod tree;

pub use move_selection::{pick_move, search_pi, soft_pick_cutoff};
pub use node::{EdgeStats, MctsNode, NodeId};
pub use options::Options;
pub use player::{MctsPlayer, TreeSearchCallback};
pub use provenance::{InferenceLog, InferenceRecord};
pub use time_budget::time_recommendation;
pub use tree::{SearchTree, Tree};
