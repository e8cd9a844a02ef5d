//! Deterministic randomized ordering of candidate configurations.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use gl_types::Assignment;

/// Seeded shuffle of the candidate list.
///
/// The seed is an explicit value held here, not ambient process state, so
/// independent searches in one process stay independently reproducible.
/// One `SearchOrder` seeds its generator exactly once per permutation;
/// there is no reseeding between configurations.
#[derive(Debug, Clone, Copy)]
pub struct SearchOrder {
    seed: u64,
}

impl SearchOrder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Shuffle `candidates` into the order the search will walk them.
    pub fn permute(&self, mut candidates: Vec<Assignment>) -> Vec<Assignment> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        candidates.shuffle(&mut rng);
        candidates
    }
}
