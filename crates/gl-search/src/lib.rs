//! # gl-search
//!
//! The search core of GridLoom: expands a hyperparameter grid into candidate
//! configurations, walks them in a seeded deterministic order, evaluates each
//! with k-fold cross-validation against a pluggable trainable unit, and
//! tracks the best configuration together with its inferred optimal number
//! of training epochs.

mod curve;
mod driver;
mod evaluate;
mod folds;
mod order;
mod space;
mod tracker;

pub use curve::{average_curves, CurveSummary};
pub use driver::{SearchDriver, SearchOutcome};
pub use evaluate::FoldEvaluator;
pub use folds::{FoldSplit, KFold};
pub use order::SearchOrder;
pub use space::expand_grid;
pub use tracker::{BestResult, BestTracker, TrialRecord, TrialStatus};
