//! Deterministic windowing of the encoded corpus into training batches.

use gl_types::{Batch, BatchCollection, CandidateConfig};

/// Window `int_text` into full `(batch_size x seq_length)` batches.
///
/// Geometry follows the configuration: `n_batches = len / (batch_size *
/// seq_length)`, trailing tokens that don't fill a complete batch are
/// dropped. Targets are the inputs shifted one token forward; the final
/// target wraps around to the first kept token. Output depends only on
/// `int_text`, `batch_size`, and `seq_length`.
pub fn build_batches(int_text: &[u32], config: &CandidateConfig) -> BatchCollection {
    let batch_size = config.batch_size;
    let seq_length = config.seq_length;
    let n_batches = int_text.len() / (batch_size * seq_length);

    if n_batches == 0 {
        tracing::warn!(
            "Corpus of {} tokens yields no full batches at batch_size={} seq_length={}",
            int_text.len(),
            batch_size,
            seq_length
        );
        return BatchCollection::new(Vec::new());
    }

    let total = n_batches * batch_size * seq_length;
    let kept = &int_text[..total];

    // Row-major reshape to (batch_size, n_batches * seq_length), then one
    // seq_length-wide column slice per batch.
    let row_width = n_batches * seq_length;
    let token_at = |row: usize, col: usize| kept[row * row_width + col];
    let target_at = |row: usize, col: usize| {
        let flat = row * row_width + col;
        if flat + 1 < total {
            kept[flat + 1]
        } else {
            kept[0]
        }
    };

    let mut batches = Vec::with_capacity(n_batches);
    for b in 0..n_batches {
        let mut inputs = Vec::with_capacity(batch_size);
        let mut targets = Vec::with_capacity(batch_size);
        for row in 0..batch_size {
            let start = b * seq_length;
            inputs.push((start..start + seq_length).map(|c| token_at(row, c)).collect());
            targets.push((start..start + seq_length).map(|c| target_at(row, c)).collect());
        }
        batches.push(Batch::new(inputs, targets));
    }

    tracing::debug!(
        "Built {} batches ({} tokens kept, {} dropped)",
        n_batches,
        total,
        int_text.len() - total
    );
    BatchCollection::new(batches)
}
