//! Contract for the external trainable unit.
//!
//! The search core never looks inside the model: it builds a fresh instance
//! per (configuration, fold) pair and consumes the per-epoch validation
//! losses `train` returns.

use crate::batches::JoinedBatch;
use crate::config::CandidateConfig;
use crate::errors::TuneResult;
use crate::vocab::Vocabulary;

/// One trainable sequence model instance.
pub trait SequenceModel {
    /// Run one full training pass: `config.num_epochs` epochs over
    /// `train`, validating against `validation` after every epoch.
    ///
    /// Returns one validation loss per epoch, in epoch order. Training
    /// failures (e.g. numerical divergence) surface as
    /// [`crate::TrainError`].
    fn train(
        &mut self,
        config: &CandidateConfig,
        train: &[JoinedBatch],
        validation: &[JoinedBatch],
    ) -> TuneResult<Vec<f64>>;
}

/// Builds fresh model instances.
///
/// A new instance per fold is required for cross-validation validity: no
/// weights or optimizer state may leak between folds or configurations.
pub trait ModelFactory {
    fn build(
        &self,
        vocab: &Vocabulary,
        config: &CandidateConfig,
    ) -> TuneResult<Box<dyn SequenceModel>>;
}
