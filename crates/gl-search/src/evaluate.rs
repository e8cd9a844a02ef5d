//! Per-fold training invocation of the external trainable unit.

use tracing::debug;

use gl_types::{
    BatchCollection, CandidateConfig, ModelFactory, TrainError, TuneResult, Vocabulary,
};

use crate::folds::FoldSplit;

/// Runs the trainable unit for one configuration across fold splits.
///
/// Each fold gets a fresh model instance; nothing is shared between folds,
/// which cross-validation requires for a valid generalization estimate.
pub struct FoldEvaluator<'a> {
    vocab: &'a Vocabulary,
    factory: &'a dyn ModelFactory,
}

impl<'a> FoldEvaluator<'a> {
    pub fn new(vocab: &'a Vocabulary, factory: &'a dyn ModelFactory) -> Self {
        Self { vocab, factory }
    }

    /// Train on one fold and return its validation loss curve.
    ///
    /// Train and held-out batches are re-packed into the stacked layout the
    /// trainable unit expects. The curve must hold exactly one loss per
    /// configured epoch.
    pub fn evaluate_fold(
        &self,
        config: &CandidateConfig,
        batches: &BatchCollection,
        split: &FoldSplit,
    ) -> TuneResult<Vec<f64>> {
        let train = batches.joined_of(&split.train);
        let validation = batches.joined_of(&split.validation);

        let mut model = self.factory.build(self.vocab, config)?;
        let curve = model.train(config, &train, &validation)?;

        if curve.len() != config.num_epochs {
            return Err(TrainError::CurveLength {
                expected: config.num_epochs,
                actual: curve.len(),
            }
            .into());
        }
        Ok(curve)
    }

    /// Evaluate every fold for one configuration.
    ///
    /// All folds or nothing: a failure on any fold abandons the whole
    /// configuration and discards the earlier folds' curves.
    pub fn evaluate_config(
        &self,
        config: &CandidateConfig,
        batches: &BatchCollection,
        splits: &[FoldSplit],
    ) -> TuneResult<Vec<Vec<f64>>> {
        let mut curves = Vec::with_capacity(splits.len());
        for (fold, split) in splits.iter().enumerate() {
            debug!(
                "Fold {}/{}: {} train batches, {} validation batches",
                fold + 1,
                splits.len(),
                split.train.len(),
                split.validation.len()
            );
            curves.push(self.evaluate_fold(config, batches, split)?);
        }
        Ok(curves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folds::KFold;
    use gl_types::{Batch, JoinedBatch, SequenceModel, TuneError};
    use std::cell::Cell;

    fn sample_config(num_epochs: usize) -> CandidateConfig {
        CandidateConfig {
            num_epochs,
            batch_size: 2,
            rnn_size: 16,
            embed_dim: 8,
            seq_length: 3,
            learning_rate: 0.01,
            dropout_keep_prob: 1.0,
            lstm_layers: 1,
            save_dir: "./save".to_string(),
        }
    }

    fn sample_batches(n: usize) -> BatchCollection {
        let batches = (0..n as u32)
            .map(|i| {
                Batch::new(
                    vec![vec![i, i, i], vec![i, i, i]],
                    vec![vec![i, i, i], vec![i, i, i]],
                )
            })
            .collect();
        BatchCollection::new(batches)
    }

    fn sample_vocab() -> Vocabulary {
        Vocabulary::from_ordered_tokens(["a", "b"].iter().map(|s| s.to_string()))
    }

    /// Returns a fixed curve and records what it was trained on.
    struct FixedCurveModel {
        curve: Vec<f64>,
    }

    impl SequenceModel for FixedCurveModel {
        fn train(
            &mut self,
            _config: &CandidateConfig,
            train: &[JoinedBatch],
            validation: &[JoinedBatch],
        ) -> TuneResult<Vec<f64>> {
            assert!(!train.is_empty());
            assert!(!validation.is_empty());
            Ok(self.curve.clone())
        }
    }

    struct FixedCurveFactory {
        curve: Vec<f64>,
        builds: Cell<usize>,
    }

    impl ModelFactory for FixedCurveFactory {
        fn build(
            &self,
            _vocab: &Vocabulary,
            _config: &CandidateConfig,
        ) -> TuneResult<Box<dyn SequenceModel>> {
            self.builds.set(self.builds.get() + 1);
            Ok(Box::new(FixedCurveModel {
                curve: self.curve.clone(),
            }))
        }
    }

    struct DivergingFactory;

    impl ModelFactory for DivergingFactory {
        fn build(
            &self,
            _vocab: &Vocabulary,
            _config: &CandidateConfig,
        ) -> TuneResult<Box<dyn SequenceModel>> {
            struct Diverging;
            impl SequenceModel for Diverging {
                fn train(
                    &mut self,
                    _config: &CandidateConfig,
                    _train: &[JoinedBatch],
                    _validation: &[JoinedBatch],
                ) -> TuneResult<Vec<f64>> {
                    Err(TrainError::Diverged {
                        epoch: 1,
                        message: "loss is NaN".to_string(),
                    }
                    .into())
                }
            }
            Ok(Box::new(Diverging))
        }
    }

    #[test]
    fn collects_one_curve_per_fold() {
        let vocab = sample_vocab();
        let factory = FixedCurveFactory {
            curve: vec![2.0, 1.0],
            builds: Cell::new(0),
        };
        let evaluator = FoldEvaluator::new(&vocab, &factory);

        let batches = sample_batches(4);
        let splits = KFold::new(4).split(batches.len()).unwrap();
        let curves = evaluator
            .evaluate_config(&sample_config(2), &batches, &splits)
            .unwrap();

        assert_eq!(curves.len(), 4);
        assert!(curves.iter().all(|c| c == &vec![2.0, 1.0]));
    }

    #[test]
    fn builds_a_fresh_model_per_fold() {
        let vocab = sample_vocab();
        let factory = FixedCurveFactory {
            curve: vec![1.0],
            builds: Cell::new(0),
        };
        let evaluator = FoldEvaluator::new(&vocab, &factory);

        let batches = sample_batches(6);
        let splits = KFold::new(3).split(batches.len()).unwrap();
        evaluator
            .evaluate_config(&sample_config(1), &batches, &splits)
            .unwrap();

        assert_eq!(factory.builds.get(), 3);
    }

    #[test]
    fn run_failure_abandons_the_configuration() {
        let vocab = sample_vocab();
        let factory = DivergingFactory;
        let evaluator = FoldEvaluator::new(&vocab, &factory);

        let batches = sample_batches(4);
        let splits = KFold::new(2).split(batches.len()).unwrap();
        let result = evaluator.evaluate_config(&sample_config(2), &batches, &splits);

        assert!(matches!(
            result,
            Err(TuneError::Train(TrainError::Diverged { .. }))
        ));
    }

    #[test]
    fn short_curve_is_a_contract_violation() {
        let vocab = sample_vocab();
        let factory = FixedCurveFactory {
            curve: vec![1.0, 2.0, 3.0],
            builds: Cell::new(0),
        };
        let evaluator = FoldEvaluator::new(&vocab, &factory);

        let batches = sample_batches(4);
        let splits = KFold::new(2).split(batches.len()).unwrap();
        // Config expects 5 epochs, model returned 3.
        let result = evaluator.evaluate_config(&sample_config(5), &batches, &splits);

        assert!(matches!(
            result,
            Err(TuneError::Train(TrainError::CurveLength {
                expected: 5,
                actual: 3
            }))
        ));
    }
}
