//! K-fold partitioning of the batch index range.

use serde::{Deserialize, Serialize};

use gl_types::{SearchError, TuneResult};

/// One train/validation split over batch indices.
///
/// `train` and `validation` are disjoint and together cover every index
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldSplit {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Contiguous k-fold splitter.
///
/// Splits depend only on `(n, k)`: fold `i` holds out the `i`-th contiguous
/// slice as validation, with the first `n % k` folds one element larger.
/// No randomness, so partitioning is identical across runs and independent
/// of configuration contents.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Produce the `k` splits over `0..n`.
    ///
    /// Fails with [`SearchError::InvalidParameter`] for `k < 2` and
    /// [`SearchError::InsufficientData`] for `k > n`.
    pub fn split(&self, n: usize) -> TuneResult<Vec<FoldSplit>> {
        if self.n_splits < 2 {
            return Err(SearchError::InvalidParameter {
                parameter: "k_folds".to_string(),
                message: "cross-validation needs at least 2 folds".to_string(),
            }
            .into());
        }
        if self.n_splits > n {
            return Err(SearchError::InsufficientData {
                folds: self.n_splits,
                batches: n,
            }
            .into());
        }

        let base = n / self.n_splits;
        let remainder = n % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = if fold < remainder { base + 1 } else { base };
            let end = start + size;

            let validation: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n).collect();
            splits.push(FoldSplit { train, validation });

            start = end;
        }

        Ok(splits)
    }
}
