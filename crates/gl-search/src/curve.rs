//! Cross-fold loss aggregation and optimal-epoch inference.

use serde::{Deserialize, Serialize};

use gl_types::{SearchError, TuneResult};

/// Elementwise mean of per-fold validation loss curves.
///
/// Every curve must have the same length (one loss per epoch); partial
/// fold results are never mixed into an average.
pub fn average_curves(curves: &[Vec<f64>]) -> TuneResult<Vec<f64>> {
    let first = curves.first().ok_or(SearchError::EmptyCurveSet)?;
    let num_epochs = first.len();

    for curve in curves {
        if curve.len() != num_epochs {
            return Err(SearchError::CurveMismatch {
                expected: num_epochs,
                actual: curve.len(),
            }
            .into());
        }
    }

    let k = curves.len() as f64;
    let average = (0..num_epochs)
        .map(|epoch| curves.iter().map(|curve| curve[epoch]).sum::<f64>() / k)
        .collect();
    Ok(average)
}

/// The minimum of an average loss curve and where it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSummary {
    /// Minimum average validation loss.
    pub best_loss: f64,
    /// Zero-based index of the first minimum.
    pub best_epoch_index: usize,
    /// Epochs to train for: index 0 means "train for 1 epoch".
    pub best_num_epochs: usize,
}

impl CurveSummary {
    /// Summarize `curve`, resolving ties toward the earliest epoch (shorter
    /// training wins among equally good options).
    pub fn from_curve(curve: &[f64]) -> TuneResult<Self> {
        let mut best_loss = *curve.first().ok_or(SearchError::EmptyCurveSet)?;
        let mut best_epoch_index = 0;

        for (epoch, &loss) in curve.iter().enumerate().skip(1) {
            if loss < best_loss {
                best_loss = loss;
                best_epoch_index = epoch;
            }
        }

        Ok(Self {
            best_loss,
            best_epoch_index,
            best_num_epochs: best_epoch_index + 1,
        })
    }
}
