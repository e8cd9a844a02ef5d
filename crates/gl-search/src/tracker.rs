//! Trial records and running-best tracking for one search run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gl_types::{Assignment, CandidateConfig};

/// Lifecycle state of a single trial (one candidate configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Running,
    Completed,
    Failed,
}

/// Per-candidate evaluation record, kept for the whole run so a search's
/// history is inspectable after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub id: Uuid,
    pub run_id: Uuid,
    /// Position in the shuffled search order.
    pub trial_number: usize,
    pub assignment: Assignment,
    pub status: TrialStatus,
    pub best_loss: Option<f64>,
    pub best_num_epochs: Option<usize>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl TrialRecord {
    pub fn new(run_id: Uuid, trial_number: usize, assignment: Assignment) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            trial_number,
            assignment,
            status: TrialStatus::Running,
            best_loss: None,
            best_num_epochs: None,
            started_at: Utc::now(),
            finished_at: None,
            error: None,
        }
    }

    pub fn mark_completed(&mut self, best_loss: f64, best_num_epochs: usize) {
        self.status = TrialStatus::Completed;
        self.best_loss = Some(best_loss);
        self.best_num_epochs = Some(best_num_epochs);
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = TrialStatus::Failed;
        self.error = Some(error);
        self.finished_at = Some(Utc::now());
    }
}

/// The best candidate seen so far: its cross-fold minimum average loss, the
/// configuration re-pinned to the inferred optimal epoch count, and that
/// epoch count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestResult {
    pub loss: f64,
    pub config: CandidateConfig,
    pub num_epochs: usize,
}

/// Running-best accumulator over one search run.
///
/// Mutated exactly once per completed configuration, always from the
/// single driver loop. A parallel driver would need to guard `consider`
/// with a mutex; the strict-less-than policy is not atomic.
#[derive(Debug, Clone, Default)]
pub struct BestTracker {
    best: Option<BestResult>,
}

impl BestTracker {
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Offer a completed candidate. Replaces the tracked best only on a
    /// strict loss decrease, so exact ties keep the earlier candidate in
    /// search order. The stored configuration is a new value with
    /// `num_epochs` overwritten to the inferred optimum; `config` itself
    /// is left untouched.
    pub fn consider(&mut self, config: &CandidateConfig, loss: f64, num_epochs: usize) -> bool {
        let improves = match &self.best {
            None => true,
            Some(current) => loss < current.loss,
        };
        if improves {
            self.best = Some(BestResult {
                loss,
                config: config.with_num_epochs(num_epochs),
                num_epochs,
            });
        }
        improves
    }

    pub fn best(&self) -> Option<&BestResult> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<BestResult> {
        self.best
    }
}
