//! Grid expansion: from candidate lists to concrete assignments.

use gl_types::{Assignment, HyperGrid, SearchError, TuneResult};

/// Expand `grid` into the full Cartesian product of assignments, one value
/// per parameter each.
///
/// The result has `Π len(candidates)` entries; enumeration order is
/// unspecified (the search order is randomized downstream). Fails with
/// [`SearchError::InvalidGrid`] if any parameter has no candidates.
pub fn expand_grid(grid: &HyperGrid) -> TuneResult<Vec<Assignment>> {
    for axis in &grid.axes {
        if axis.candidates.is_empty() {
            return Err(SearchError::InvalidGrid {
                parameter: axis.name.clone(),
            }
            .into());
        }
    }

    let mut result: Vec<Assignment> = vec![Assignment::new()];
    for axis in &grid.axes {
        let mut next = Vec::with_capacity(result.len() * axis.candidates.len());
        for existing in &result {
            for value in &axis.candidates {
                let mut assignment = existing.clone();
                assignment.insert(axis.name.clone(), value.clone());
                next.push(assignment);
            }
        }
        result = next;
    }

    Ok(result)
}
