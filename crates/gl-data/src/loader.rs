use std::fs;
use std::path::Path;

use gl_types::{DataError, TuneResult};

/// Raw corpus loader.
///
/// Some corpora carry a fixed-length ownership notice at the top of the
/// file; `skip_chars` drops that many leading characters before the text
/// is handed to preprocessing.
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    skip_chars: usize,
}

impl CorpusLoader {
    pub fn new() -> Self {
        Self { skip_chars: 0 }
    }

    pub fn with_skip_chars(skip_chars: usize) -> Self {
        Self { skip_chars }
    }

    /// Load the corpus text from `path`.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> TuneResult<String> {
        let path = path.as_ref();
        tracing::info!("Loading corpus from: {}", path.display());

        if !path.exists() {
            return Err(DataError::CorpusNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let raw = fs::read_to_string(path)?;
        let text: String = raw.chars().skip(self.skip_chars).collect();

        if text.trim().is_empty() {
            return Err(DataError::EmptyCorpus {
                path: path.display().to_string(),
            }
            .into());
        }

        tracing::debug!("Loaded {} characters", text.chars().count());
        Ok(text)
    }
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new()
    }
}
