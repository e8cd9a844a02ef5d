//! Hyperparameter grid definitions and concrete parameter values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A concrete hyperparameter value drawn from the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integer candidates coerce losslessly.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// One grid dimension: a parameter name and its ordered candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub name: String,
    pub candidates: Vec<ParamValue>,
}

/// The full hyperparameter grid: an ordered list of axes.
///
/// Axis order only affects enumeration order, which downstream shuffling
/// makes irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperGrid {
    pub axes: Vec<GridAxis>,
}

impl HyperGrid {
    pub fn new() -> Self {
        Self { axes: Vec::new() }
    }

    pub fn with_values(mut self, name: impl Into<String>, candidates: Vec<ParamValue>) -> Self {
        self.axes.push(GridAxis {
            name: name.into(),
            candidates,
        });
        self
    }

    pub fn with_ints(self, name: impl Into<String>, values: Vec<i64>) -> Self {
        self.with_values(name, values.into_iter().map(ParamValue::Int).collect())
    }

    pub fn with_floats(self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.with_values(name, values.into_iter().map(ParamValue::Float).collect())
    }

    pub fn with_texts(self, name: impl Into<String>, values: Vec<&str>) -> Self {
        self.with_values(
            name,
            values
                .into_iter()
                .map(|v| ParamValue::Text(v.to_string()))
                .collect(),
        )
    }

    /// Total number of grid points (`None` on overflow).
    pub fn size(&self) -> Option<usize> {
        let mut total: usize = 1;
        for axis in &self.axes {
            total = total.checked_mul(axis.candidates.len())?;
        }
        Some(total)
    }
}

impl Default for HyperGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// A concrete assignment of one value per grid parameter.
pub type Assignment = HashMap<String, ParamValue>;
