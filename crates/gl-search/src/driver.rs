//! The configuration loop: the error boundary between per-candidate
//! failures and the search run as a whole.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use gl_data::build_batches;
use gl_types::{
    Assignment, CandidateConfig, HyperGrid, ModelFactory, SearchError, TuneResult, Vocabulary,
};

use crate::curve::{average_curves, CurveSummary};
use crate::evaluate::FoldEvaluator;
use crate::folds::KFold;
use crate::order::SearchOrder;
use crate::space::expand_grid;
use crate::tracker::{BestResult, BestTracker, TrialRecord};

/// Outcome of one full search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub run_id: Uuid,
    pub trials: Vec<TrialRecord>,
    pub completed: usize,
    pub failed: usize,
    pub best: Option<BestResult>,
}

/// Sequential grid-search driver.
///
/// Expands the grid, walks the candidates in seeded-shuffle order, and
/// evaluates each with k-fold cross-validation. Per-candidate failures
/// (unevaluable configuration, too few batches for the fold count, a
/// training run failure) are logged and skipped; only errors raised before
/// any candidate is attempted abort the run.
#[derive(Debug, Clone)]
pub struct SearchDriver {
    grid: HyperGrid,
    k_folds: usize,
    seed: u64,
}

impl SearchDriver {
    pub fn new(grid: HyperGrid, k_folds: usize, seed: u64) -> Self {
        Self {
            grid,
            k_folds,
            seed,
        }
    }

    /// Run the search over the preprocessed corpus.
    pub fn run(
        &self,
        int_text: &[u32],
        vocab: &Vocabulary,
        factory: &dyn ModelFactory,
    ) -> TuneResult<SearchOutcome> {
        if self.k_folds < 2 {
            return Err(SearchError::InvalidParameter {
                parameter: "k_folds".to_string(),
                message: "cross-validation needs at least 2 folds".to_string(),
            }
            .into());
        }

        let candidates = expand_grid(&self.grid)?;
        let ordered = SearchOrder::new(self.seed).permute(candidates);

        let run_id = Uuid::new_v4();
        info!(
            "Search run {run_id}: {} candidates, {} folds, seed {}",
            ordered.len(),
            self.k_folds,
            self.seed
        );

        let evaluator = FoldEvaluator::new(vocab, factory);
        let mut tracker = BestTracker::new();
        let mut trials = Vec::with_capacity(ordered.len());
        let mut completed = 0;
        let mut failed = 0;

        for (trial_number, assignment) in ordered.into_iter().enumerate() {
            let mut record = TrialRecord::new(run_id, trial_number, assignment.clone());
            info!("Candidate {}: {:?}", trial_number, assignment);

            match self.evaluate_candidate(&assignment, int_text, &evaluator) {
                Ok((config, summary)) => {
                    let improved =
                        tracker.consider(&config, summary.best_loss, summary.best_num_epochs);
                    record.mark_completed(summary.best_loss, summary.best_num_epochs);
                    completed += 1;

                    info!(
                        "Candidate {} done: loss {:.4} at {} epochs{}",
                        trial_number,
                        summary.best_loss,
                        summary.best_num_epochs,
                        if improved { " (new best)" } else { "" }
                    );
                    if let Some(best) = tracker.best() {
                        info!(
                            "Best so far: loss {:.4}, {} epochs, {}",
                            best.loss, best.num_epochs, best.config
                        );
                    }
                }
                Err(error) if error.is_per_config() => {
                    warn!("Skipping candidate {}: {}", trial_number, error);
                    record.mark_failed(error.to_string());
                    failed += 1;
                }
                Err(error) => return Err(error),
            }

            trials.push(record);
        }

        info!(
            "Search run {run_id} finished: {} completed, {} skipped",
            completed, failed
        );

        Ok(SearchOutcome {
            run_id,
            trials,
            completed,
            failed,
            best: tracker.into_best(),
        })
    }

    /// Evaluate one candidate end to end: typed config, batches, folds,
    /// training, aggregation.
    fn evaluate_candidate(
        &self,
        assignment: &Assignment,
        int_text: &[u32],
        evaluator: &FoldEvaluator<'_>,
    ) -> TuneResult<(CandidateConfig, CurveSummary)> {
        let config = CandidateConfig::from_assignment(assignment)?;

        // Batch geometry depends on the candidate, so batches are rebuilt
        // per configuration.
        let batches = build_batches(int_text, &config);
        let splits = KFold::new(self.k_folds).split(batches.len())?;

        let curves = evaluator.evaluate_config(&config, &batches, &splits)?;
        let average = average_curves(&curves)?;
        let summary = CurveSummary::from_curve(&average)?;

        Ok((config, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrialStatus;
    use gl_types::{
        JoinedBatch, ParamValue, SequenceModel, TrainError, TuneError,
    };

    fn grid_with_rnn_sizes(rnn_sizes: Vec<i64>) -> HyperGrid {
        HyperGrid::new()
            .with_ints("num_epochs", vec![3])
            .with_ints("batch_size", vec![2])
            .with_ints("rnn_size", rnn_sizes)
            .with_ints("embed_dim", vec![8])
            .with_ints("seq_length", vec![3])
            .with_floats("learning_rate", vec![0.01])
            .with_floats("dropout_keep_prob", vec![1.0])
            .with_ints("lstm_layers", vec![1])
            .with_texts("save_dir", vec!["./save"])
    }

    fn base_grid() -> HyperGrid {
        grid_with_rnn_sizes(vec![16])
    }

    fn vocab() -> Vocabulary {
        Vocabulary::from_ordered_tokens(["a", "b", "c"].iter().map(|s| s.to_string()))
    }

    /// Loss depends on rnn_size so different candidates rank differently.
    struct RankedFactory;

    impl ModelFactory for RankedFactory {
        fn build(
            &self,
            _vocab: &Vocabulary,
            config: &CandidateConfig,
        ) -> TuneResult<Box<dyn SequenceModel>> {
            struct Ranked {
                floor: f64,
            }
            impl SequenceModel for Ranked {
                fn train(
                    &mut self,
                    config: &CandidateConfig,
                    _train: &[JoinedBatch],
                    _validation: &[JoinedBatch],
                ) -> TuneResult<Vec<f64>> {
                    // Decreasing curve bottoming out at `floor`.
                    Ok((0..config.num_epochs)
                        .map(|e| self.floor + (config.num_epochs - 1 - e) as f64)
                        .collect())
                }
            }
            Ok(Box::new(Ranked {
                floor: config.rnn_size as f64 / 100.0,
            }))
        }
    }

    /// Fails whenever rnn_size is 64, succeeds otherwise.
    struct FlakyFactory;

    impl ModelFactory for FlakyFactory {
        fn build(
            &self,
            _vocab: &Vocabulary,
            config: &CandidateConfig,
        ) -> TuneResult<Box<dyn SequenceModel>> {
            struct Flaky {
                fail: bool,
            }
            impl SequenceModel for Flaky {
                fn train(
                    &mut self,
                    config: &CandidateConfig,
                    _train: &[JoinedBatch],
                    _validation: &[JoinedBatch],
                ) -> TuneResult<Vec<f64>> {
                    if self.fail {
                        return Err(TrainError::Diverged {
                            epoch: 0,
                            message: "loss exploded".to_string(),
                        }
                        .into());
                    }
                    Ok(vec![1.0; config.num_epochs])
                }
            }
            Ok(Box::new(Flaky {
                fail: config.rnn_size == 64,
            }))
        }
    }

    #[test]
    fn single_candidate_run() {
        // 30 tokens / (2 * 3) = 5 batches, split 2 ways.
        let int_text: Vec<u32> = (0..30).map(|i| i % 3).collect();
        let driver = SearchDriver::new(base_grid(), 2, 0);

        let outcome = driver.run(&int_text, &vocab(), &RankedFactory).unwrap();
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.trials.len(), 1);

        let best = outcome.best.unwrap();
        // Curve [2.16, 1.16, 0.16]: minimum at the last epoch.
        assert_eq!(best.num_epochs, 3);
        assert_eq!(best.config.num_epochs, 3);
        assert!((best.loss - 0.16).abs() < 1e-9);
    }

    #[test]
    fn best_candidate_wins_across_grid() {
        let grid = grid_with_rnn_sizes(vec![16, 8, 32]);
        let int_text: Vec<u32> = (0..60).map(|i| i % 3).collect();
        let driver = SearchDriver::new(grid, 2, 0);

        let outcome = driver.run(&int_text, &vocab(), &RankedFactory).unwrap();
        assert_eq!(outcome.completed, 3);

        // Smallest rnn_size gives the lowest floor.
        let best = outcome.best.unwrap();
        assert_eq!(best.config.rnn_size, 8);
        assert!((best.loss - 0.08).abs() < 1e-9);
    }

    #[test]
    fn run_failures_are_skipped_not_fatal() {
        let grid = grid_with_rnn_sizes(vec![64, 16]);
        let int_text: Vec<u32> = (0..60).map(|i| i % 3).collect();
        let driver = SearchDriver::new(grid, 2, 0);

        let outcome = driver.run(&int_text, &vocab(), &FlakyFactory).unwrap();
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.failed, 1);

        let failed: Vec<_> = outcome
            .trials
            .iter()
            .filter(|t| t.status == TrialStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].error.as_deref().unwrap().contains("diverged"));

        // The surviving candidate still becomes the best.
        assert_eq!(outcome.best.unwrap().config.rnn_size, 16);
    }

    #[test]
    fn too_few_batches_skips_the_candidate() {
        // 12 tokens -> 2 batches, but 4 folds requested.
        let int_text: Vec<u32> = (0..12).collect();
        let driver = SearchDriver::new(base_grid(), 4, 0);

        let outcome = driver.run(&int_text, &vocab(), &RankedFactory).unwrap();
        assert_eq!(outcome.completed, 0);
        assert_eq!(outcome.failed, 1);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn empty_candidate_list_aborts_before_search() {
        let grid = base_grid().with_values("extra", vec![]);
        let driver = SearchDriver::new(grid, 2, 0);

        let result = driver.run(&[0; 30], &vocab(), &RankedFactory);
        assert!(matches!(
            result,
            Err(TuneError::Search(SearchError::InvalidGrid { .. }))
        ));
    }

    #[test]
    fn identical_seeds_walk_identical_orders() {
        let grid = grid_with_rnn_sizes(vec![8, 16, 32, 64, 128]);
        let int_text: Vec<u32> = (0..60).map(|i| i % 3).collect();

        let first = SearchDriver::new(grid.clone(), 2, 9)
            .run(&int_text, &vocab(), &RankedFactory)
            .unwrap();
        let second = SearchDriver::new(grid, 2, 9)
            .run(&int_text, &vocab(), &RankedFactory)
            .unwrap();

        let order_of = |outcome: &SearchOutcome| {
            outcome
                .trials
                .iter()
                .map(|t| t.assignment["rnn_size"].clone())
                .collect::<Vec<ParamValue>>()
        };
        assert_eq!(order_of(&first), order_of(&second));
    }

    #[test]
    fn fewer_than_two_folds_is_rejected_up_front() {
        let driver = SearchDriver::new(base_grid(), 1, 0);
        let result = driver.run(&[0; 30], &vocab(), &RankedFactory);
        assert!(matches!(
            result,
            Err(TuneError::Search(SearchError::InvalidParameter { .. }))
        ));
    }
}
