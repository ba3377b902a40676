//! Board symmetries for inference augmentation.
//!
//! The square board has 8 symmetries (the dihedral group). Features are
//! transformed before inference and the policy is transformed back with the
//! inverse afterwards. The pass probability sits outside the board and is never
//! permuted.

use crate::game::coord::N;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    Rot90,
    Rot180,
    Rot270,
    Flip,       // transpose
    FlipRot90,  // transpose then rot90: vertical mirror
    FlipRot180, // transpose then rot180: anti-transpose
    FlipRot270, // transpose then rot270: horizontal mirror
}

pub const NUM_SYMMETRIES: usize = 8;

impl Symmetry {
    pub const ALL: [Symmetry; NUM_SYMMETRIES] = [
        Symmetry::Identity,
        Symmetry::Rot90,
        Symmetry::Rot180,
        Symmetry::Rot270,
        Symmetry::Flip,
        Symmetry::FlipRot90,
        Symmetry::FlipRot180,
        Symmetry::FlipRot270,
    ];

    /// Uniformly random symmetry.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..NUM_SYMMETRIES)]
    }

    pub fn inverse(self) -> Self {
        match self {
            Symmetry::Rot90 => Symmetry::Rot270,
            Symmetry::Rot270 => Symmetry::Rot90,
            // Rot180 and every reflection are involutions.
            other => other,
        }
    }

    /// Where the point at `(row, col)` lands after the transform.
    pub fn transform(self, row: usize, col: usize) -> (usize, usize) {
        let last = N - 1;
        match self {
            Symmetry::Identity => (row, col),
            Symmetry::Rot90 => (last - col, row),
            Symmetry::Rot180 => (last - row, last - col),
            Symmetry::Rot270 => (col, last - row),
            Symmetry::Flip => (col, row),
            Symmetry::FlipRot90 => (last - row, col),
            Symmetry::FlipRot180 => (last - col, last - row),
            Symmetry::FlipRot270 => (row, last - col),
        }
    }

    pub fn transform_point(self, point: usize) -> usize {
        let (row, col) = self.transform(point / N, point % N);
        row * N + col
    }

    /// Permutes point-major data (`channels` values per point) of the N x N
    /// board from `input` into `output`. Both slices must hold at least
    /// `N * N * channels` values; anything past the board is left untouched.
    pub fn apply<T: Copy>(self, input: &[T], output: &mut [T], channels: usize) {
        let board_len = N * N * channels;
        assert!(
            input.len() >= board_len && output.len() >= board_len,
            "symmetry buffers too small: {} / {} < {}",
            input.len(),
            output.len(),
            board_len
        );
        if self == Symmetry::Identity {
            output[..board_len].copy_from_slice(&input[..board_len]);
            return;
        }
        for src in 0..N * N {
            let dst = self.transform_point(src);
            output[dst * channels..(dst + 1) * channels]
                .copy_from_slice(&input[src * channels..(src + 1) * channels]);
        }
    }
}
