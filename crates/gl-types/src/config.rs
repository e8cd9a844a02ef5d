//! Typed candidate configuration built from a grid assignment.

use serde::{Deserialize, Serialize};

use crate::errors::{SearchError, TuneResult};
use crate::grid::Assignment;

/// One fully specified candidate: every hyperparameter pinned to a value.
///
/// Built once per trial from a raw [`Assignment`] and validated at
/// construction, so everything downstream works with named, typed fields
/// instead of an untyped map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Number of training epochs per fold evaluation.
    pub num_epochs: usize,
    /// Sequences per batch.
    pub batch_size: usize,
    /// Hidden state width of the recurrent cell.
    pub rnn_size: usize,
    /// Token embedding dimension.
    pub embed_dim: usize,
    /// Tokens per sequence.
    pub seq_length: usize,
    pub learning_rate: f64,
    /// Keep probability for dropout, in (0, 1].
    pub dropout_keep_prob: f64,
    /// Stacked recurrent layers.
    pub lstm_layers: usize,
    /// Where the trainable unit writes its checkpoints.
    pub save_dir: String,
}

impl CandidateConfig {
    /// Build and validate a configuration from a grid assignment.
    ///
    /// Fails with [`SearchError::MissingParameter`] or
    /// [`SearchError::InvalidParameter`] if the assignment is incomplete or
    /// any value is outside its domain.
    pub fn from_assignment(assignment: &Assignment) -> TuneResult<Self> {
        let config = Self {
            num_epochs: require_count(assignment, "num_epochs")?,
            batch_size: require_count(assignment, "batch_size")?,
            rnn_size: require_count(assignment, "rnn_size")?,
            embed_dim: require_count(assignment, "embed_dim")?,
            seq_length: require_count(assignment, "seq_length")?,
            learning_rate: require_float(assignment, "learning_rate")?,
            dropout_keep_prob: require_float(assignment, "dropout_keep_prob")?,
            lstm_layers: require_count(assignment, "lstm_layers")?,
            save_dir: require_text(assignment, "save_dir")?,
        };

        if config.learning_rate <= 0.0 {
            return Err(invalid("learning_rate", "must be positive").into());
        }
        if config.dropout_keep_prob <= 0.0 || config.dropout_keep_prob > 1.0 {
            return Err(invalid("dropout_keep_prob", "must be in (0, 1]").into());
        }

        Ok(config)
    }

    /// A new configuration identical to this one except for `num_epochs`.
    ///
    /// Used to record the inferred optimal training duration without
    /// mutating the candidate that was actually evaluated.
    pub fn with_num_epochs(&self, num_epochs: usize) -> Self {
        Self {
            num_epochs,
            ..self.clone()
        }
    }

    /// Tokens consumed by one batch.
    pub fn tokens_per_batch(&self) -> usize {
        self.batch_size * self.seq_length
    }
}

impl std::fmt::Display for CandidateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "epochs={} batch={} rnn={} embed={} seq={} lr={} keep={} layers={}",
            self.num_epochs,
            self.batch_size,
            self.rnn_size,
            self.embed_dim,
            self.seq_length,
            self.learning_rate,
            self.dropout_keep_prob,
            self.lstm_layers,
        )
    }
}

fn invalid(parameter: &str, message: &str) -> SearchError {
    SearchError::InvalidParameter {
        parameter: parameter.to_string(),
        message: message.to_string(),
    }
}

fn require_count(assignment: &Assignment, name: &str) -> TuneResult<usize> {
    let value = assignment
        .get(name)
        .ok_or_else(|| SearchError::MissingParameter {
            parameter: name.to_string(),
        })?;
    let raw = value
        .as_int()
        .ok_or_else(|| invalid(name, "expected an integer"))?;
    if raw < 1 {
        return Err(invalid(name, "must be at least 1").into());
    }
    Ok(raw as usize)
}

fn require_float(assignment: &Assignment, name: &str) -> TuneResult<f64> {
    let value = assignment
        .get(name)
        .ok_or_else(|| SearchError::MissingParameter {
            parameter: name.to_string(),
        })?;
    value
        .as_float()
        .ok_or_else(|| invalid(name, "expected a number").into())
}

fn require_text(assignment: &Assignment, name: &str) -> TuneResult<String> {
    let value = assignment
        .get(name)
        .ok_or_else(|| SearchError::MissingParameter {
            parameter: name.to_string(),
        })?;
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| invalid(name, "expected a string").into())
}
