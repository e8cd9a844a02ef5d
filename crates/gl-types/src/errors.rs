use thiserror::Error;

/// Main error type for the GridLoom system
#[derive(Error, Debug)]
pub enum TuneError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Training error: {0}")]
    Train(#[from] TrainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TuneError {
    /// Whether this error should abandon only the current configuration
    /// rather than the whole search run.
    pub fn is_per_config(&self) -> bool {
        matches!(
            self,
            TuneError::Train(_)
                | TuneError::Search(SearchError::InsufficientData { .. })
                | TuneError::Search(SearchError::MissingParameter { .. })
                | TuneError::Search(SearchError::InvalidParameter { .. })
        )
    }
}

/// Corpus and preprocessing errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Corpus not found: {path}")]
    CorpusNotFound { path: String },

    #[error("Corpus is empty: {path}")]
    EmptyCorpus { path: String },

    #[error("Preprocess cache corrupted: {message}")]
    CacheCorrupted { message: String },
}

/// Search-space and cross-validation errors
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Empty candidate list for parameter: {parameter}")]
    InvalidGrid { parameter: String },

    #[error("Insufficient data: {folds} folds requested but only {batches} batches available")]
    InsufficientData { folds: usize, batches: usize },

    #[error("Missing required parameter: {parameter}")]
    MissingParameter { parameter: String },

    #[error("Invalid value for parameter {parameter}: {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("No loss curves to aggregate")]
    EmptyCurveSet,

    #[error("Loss curve length mismatch: expected {expected}, got {actual}")]
    CurveMismatch { expected: usize, actual: usize },
}

/// Failures raised by the trainable unit during a fold evaluation
#[derive(Error, Debug)]
pub enum TrainError {
    #[error("Training diverged at epoch {epoch}: {message}")]
    Diverged { epoch: usize, message: String },

    #[error("Training execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("Model returned {actual} epoch losses, expected {expected}")]
    CurveLength { expected: usize, actual: usize },
}

/// Result type alias for GridLoom operations
pub type TuneResult<T> = Result<T, TuneError>;
