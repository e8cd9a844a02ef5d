//! One hyperparameter search run, end to end.

use std::path::{Path, PathBuf};

use tracing::info;

use gl_data::{preprocess_or_load, CorpusLoader};
use gl_search::{SearchDriver, SearchOutcome};
use gl_types::{HyperGrid, ModelFactory, TuneResult};

/// A configured search run: corpus location, preprocessing cache, grid,
/// fold count, and shuffle seed.
#[derive(Debug, Clone)]
pub struct TuningRun {
    corpus_path: PathBuf,
    cache_path: PathBuf,
    grid: HyperGrid,
    k_folds: usize,
    seed: u64,
    skip_chars: usize,
}

impl TuningRun {
    pub fn new<P: AsRef<Path>>(corpus_path: P, grid: HyperGrid, k_folds: usize, seed: u64) -> Self {
        let corpus_path = corpus_path.as_ref().to_path_buf();
        let cache_path = corpus_path.with_extension("preprocess.json");
        Self {
            corpus_path,
            cache_path,
            grid,
            k_folds,
            seed,
            skip_chars: 0,
        }
    }

    /// Override where the preprocessing artifact is stored.
    pub fn with_cache_path<P: AsRef<Path>>(mut self, cache_path: P) -> Self {
        self.cache_path = cache_path.as_ref().to_path_buf();
        self
    }

    /// Drop a fixed-length header from the front of the corpus.
    pub fn with_skip_chars(mut self, skip_chars: usize) -> Self {
        self.skip_chars = skip_chars;
        self
    }

    /// Execute the search against `factory`'s models and return the outcome.
    ///
    /// Corpus or cache problems abort the run; everything downstream of
    /// resource acquisition is handled per candidate by the driver.
    pub fn execute(&self, factory: &dyn ModelFactory) -> TuneResult<SearchOutcome> {
        let text = CorpusLoader::with_skip_chars(self.skip_chars).load(&self.corpus_path)?;
        let processed = preprocess_or_load(&text, &self.cache_path)?;

        let driver = SearchDriver::new(self.grid.clone(), self.k_folds, self.seed);
        let outcome = driver.run(&processed.int_text, &processed.vocab, factory)?;

        match &outcome.best {
            Some(best) => info!(
                "Search complete: best loss {:.4} at {} epochs with {}",
                best.loss, best.num_epochs, best.config
            ),
            None => info!("Search complete: no candidate finished evaluation"),
        }
        Ok(outcome)
    }
}
