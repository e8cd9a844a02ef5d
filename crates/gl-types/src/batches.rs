//! Batched sequence data and typed fold accessors.

use serde::{Deserialize, Serialize};

/// One training batch: parallel input and target matrices, each
/// `batch_size` rows of `seq_length` token ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub inputs: Vec<Vec<u32>>,
    pub targets: Vec<Vec<u32>>,
}

impl Batch {
    pub fn new(inputs: Vec<Vec<u32>>, targets: Vec<Vec<u32>>) -> Self {
        debug_assert_eq!(inputs.len(), targets.len());
        Self { inputs, targets }
    }

    pub fn batch_size(&self) -> usize {
        self.inputs.len()
    }

    pub fn seq_length(&self) -> usize {
        self.inputs.first().map_or(0, Vec::len)
    }

    /// Re-pack into the stacked layout the trainable unit consumes.
    pub fn joined(&self) -> JoinedBatch {
        let mut rows = Vec::with_capacity(self.inputs.len() + self.targets.len());
        rows.extend(self.inputs.iter().cloned());
        rows.extend(self.targets.iter().cloned());
        JoinedBatch {
            rows,
            split: self.inputs.len(),
        }
    }
}

/// A batch with input and target rows stacked into one matrix.
///
/// This is purely an interface convention of the trainable unit: the first
/// `split` rows are inputs, the rest targets. No data is transformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedBatch {
    rows: Vec<Vec<u32>>,
    split: usize,
}

impl JoinedBatch {
    pub fn inputs(&self) -> &[Vec<u32>] {
        &self.rows[..self.split]
    }

    pub fn targets(&self) -> &[Vec<u32>] {
        &self.rows[self.split..]
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }
}

/// An ordered, indexable collection of batches for one candidate's
/// batch geometry. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCollection {
    batches: Vec<Batch>,
}

impl BatchCollection {
    pub fn new(batches: Vec<Batch>) -> Self {
        Self { batches }
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Batch> {
        self.batches.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        self.batches.iter()
    }

    /// Input matrices of the batches at `indices`.
    pub fn inputs_of(&self, indices: &[usize]) -> Vec<&[Vec<u32>]> {
        indices
            .iter()
            .map(|&i| self.batches[i].inputs.as_slice())
            .collect()
    }

    /// Target matrices of the batches at `indices`.
    pub fn targets_of(&self, indices: &[usize]) -> Vec<&[Vec<u32>]> {
        indices
            .iter()
            .map(|&i| self.batches[i].targets.as_slice())
            .collect()
    }

    /// The batches at `indices`, re-packed for the trainable unit.
    pub fn joined_of(&self, indices: &[usize]) -> Vec<JoinedBatch> {
        indices.iter().map(|&i| self.batches[i].joined()).collect()
    }
}
