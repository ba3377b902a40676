//! Turning root visit counts into a move.

use crate::game::coord::{Move, NUM_MOVES, NUM_POINTS, N};
use crate::game::position::Position;
use crate::mcts::node::NodeId;
use crate::mcts::tree::SearchTree;
use rand::Rng;

/// First move number that is always played deterministically when soft-pick
/// is on: the nearest even number to a twelfth of the board.
pub fn soft_pick_cutoff(soft_pick: bool) -> Option<usize> {
    soft_pick.then_some(((N * N / 12) / 2) * 2)
}

/// Picks the move to play from `root`.
///
/// From `cutoff` on (or always, when there is no cutoff) this is the most
/// visited child. Before it, a board point is sampled with probability
/// proportional to `N ^ temperature`. Passing is never sampled; if no point
/// has any visits the pass move is returned.
pub fn pick_move<T: SearchTree, R: Rng>(
    tree: &T,
    root: NodeId,
    cutoff: Option<usize>,
    temperature: f32,
    rng: &mut R,
) -> Move {
    let move_number = tree.position(root).move_number();
    match cutoff {
        Some(cutoff) if move_number < cutoff => {}
        _ => return tree.most_visited_move(root),
    }

    let mut cdf = Vec::with_capacity(NUM_POINTS);
    let mut total = 0.0f32;
    for index in 0..NUM_POINTS {
        total += (tree.child_visits(root, index) as f32).powf(temperature);
        cdf.push(total);
    }
    if total == 0.0 {
        // Every visit went to pass. This happens with badly trained models.
        return Move::Pass;
    }

    let sample = rng.random::<f32>() * total;
    let index = match cdf.partition_point(|&c| c <= sample) {
        i if i < NUM_POINTS => i,
        // Rounding put the sample on the upper bound: take the last visited point.
        _ => cdf.partition_point(|&c| c < total),
    };
    assert!(
        tree.child_visits(root, index) != 0,
        "sampled move {} has no visits",
        Move::from_index(index)
    );
    Move::from_index(index)
}

/// Normalised visit distribution recorded for training. Before the cutoff
/// the counts are raised to `temperature` first, matching what `pick_move`
/// samples from.
pub fn search_pi<T: SearchTree>(
    tree: &T,
    root: NodeId,
    cutoff: Option<usize>,
    temperature: f32,
) -> Vec<f32> {
    let before_cutoff = matches!(cutoff, Some(c) if tree.position(root).move_number() < c);
    let mut pi: Vec<f32> = (0..NUM_MOVES)
        .map(|i| {
            let n = tree.child_visits(root, i) as f32;
            if before_cutoff {
                n.powf(temperature)
            } else {
                n
            }
        })
        .collect();
    let sum: f32 = pi.iter().sum();
    if sum > 0.0 {
        pi.iter_mut().for_each(|p| *p /= sum);
    }
    pi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::coord::PASS_INDEX;
    use crate::mcts::tree::Tree;
    use crate::test_support::{set_child_visits, PlacementPosition};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tree_with_visits(visits: &[(usize, u32)]) -> Tree<PlacementPosition> {
        let mut tree = Tree::new(PlacementPosition::new());
        let root = tree.game_root();
        set_child_visits(&mut tree, root, visits);
        tree
    }

    #[test]
    fn test_cutoff_from_board_size() {
        assert_eq!(soft_pick_cutoff(true), Some(6));
        assert_eq!(soft_pick_cutoff(false), None);
    }

    #[test]
    fn test_zero_cutoff_is_deterministic() {
        let tree = tree_with_visits(&[(3, 2), (40, 9), (70, 5)]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let mv = pick_move(&tree, tree.game_root(), Some(0), 1.0, &mut rng);
            assert_eq!(mv, Move::Point(40));
        }
        assert_eq!(
            pick_move(&tree, tree.game_root(), None, 1.0, &mut rng),
            Move::Point(40)
        );
    }

    #[test]
    fn test_all_visits_on_pass_returns_pass() {
        let tree = tree_with_visits(&[(PASS_INDEX, 12)]);
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            pick_move(&tree, tree.game_root(), Some(10), 1.0, &mut rng),
            Move::Pass
        );
        let empty = tree_with_visits(&[]);
        assert_eq!(
            pick_move(&empty, empty.game_root(), Some(10), 1.0, &mut rng),
            Move::Pass
        );
    }

    #[test]
    fn test_soft_pick_only_returns_visited_points() {
        let tree = tree_with_visits(&[(5, 1), (6, 3), (PASS_INDEX, 50)]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen_five = false;
        let mut seen_six = false;
        for _ in 0..200 {
            match pick_move(&tree, tree.game_root(), Some(10), 1.0, &mut rng) {
                Move::Point(5) => seen_five = true,
                Move::Point(6) => seen_six = true,
                other => panic!("unexpected {}", other),
            }
        }
        assert!(seen_five && seen_six);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let tree = tree_with_visits(&[(1, 4), (2, 4), (3, 4), (4, 4)]);
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| pick_move(&tree, tree.game_root(), Some(10), 1.0, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
    }

    #[test]
    fn test_cutoff_is_relative_to_root_move_number() {
        let mut tree = Tree::new(PlacementPosition::new());
        let start = tree.game_root();
        let root = tree.maybe_add_child(start, Move::Point(0));
        set_child_visits(&mut tree, root, &[(5, 1), (9, 6)]);
        let mut rng = StdRng::seed_from_u64(4);
        // Move 1 is past a cutoff of 1, so the pick is deterministic.
        for _ in 0..20 {
            assert_eq!(pick_move(&tree, root, Some(1), 1.0, &mut rng), Move::Point(9));
        }
        let pi = search_pi(&tree, root, Some(1), 0.5);
        assert!((pi[9] - 6.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_pi_normalises() {
        let tree = tree_with_visits(&[(0, 1), (1, 3)]);
        let pi = search_pi(&tree, tree.game_root(), None, 0.5);
        assert_eq!(pi[0], 0.25);
        assert_eq!(pi[1], 0.75);

        let tempered = search_pi(&tree, tree.game_root(), Some(10), 0.5);
        let expected = 1.0 / (1.0 + 3f32.sqrt());
        assert!((tempered[0] - expected).abs() < 1e-6);
        assert!((tempered.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }
}
