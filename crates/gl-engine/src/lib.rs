//! # gl-engine
//!
//! Ties the GridLoom pieces together into a single run entry point: load
//! the corpus, preprocess it (or reuse the cached artifact), and hand the
//! encoded text to the search driver.

pub mod run;

pub use run::TuningRun;
