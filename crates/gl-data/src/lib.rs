//! # gl-data
//!
//! Corpus ingestion and preparation for GridLoom: raw text loading,
//! punctuation-aware tokenization with cached lookup tables, and
//! deterministic windowing of the encoded corpus into training batches.

pub mod batches;
pub mod loader;
pub mod preprocess;

pub use batches::build_batches;
pub use loader::CorpusLoader;
pub use preprocess::{preprocess, preprocess_or_load, token_lookup, Preprocessed};
