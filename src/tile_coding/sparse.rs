//! Conversions between dense tile-coded vectors and active-index lists.

use std::collections::HashSet;

use super::error::SparseError;

/// Expands an index list into a dense binary vector of length `len`.
///
/// # Errors
///
/// Fails if an index is `>= len` or appears more than once, since neither
/// can come from a tile coder.
pub fn indices_to_dense(indices: &[usize], len: usize) -> Result<Vec<f64>, SparseError> {
    let mut dense = vec![0.0; len];
    for &index in indices {
        match dense.get_mut(index) {
            None => return Err(SparseError::IndexOutOfRange { index, len }),
            Some(slot) if *slot != 0.0 => return Err(SparseError::DuplicateIndex(index)),
            Some(slot) => *slot = 1.0,
        }
    }
    Ok(dense)
}

/// Collects the positions of the `1.0` entries of a dense binary vector.
///
/// # Errors
///
/// Fails on the first entry that is neither `0.0` nor `1.0`.
pub fn dense_to_indices(dense: &[f64]) -> Result<Vec<usize>, SparseError> {
    let mut indices = Vec::new();
    for (position, &value) in dense.iter().enumerate() {
        if value == 1.0 {
            indices.push(position);
        } else if value != 0.0 {
            return Err(SparseError::NonBinaryValue { position, value });
        }
    }
    Ok(indices)
}

/// Reads an index-encoded observation (feature indices stored as `f64`).
///
/// # Errors
///
/// Fails if an entry is negative, fractional, `>= len`, or repeated.
pub fn observation_indices(observation: &[f64], len: usize) -> Result<Vec<usize>, SparseError> {
    let mut seen = HashSet::with_capacity(observation.len());
    observation
        .iter()
        .enumerate()
        .map(|(position, &value)| {
            if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
                return Err(SparseError::NonBinaryValue { position, value });
            }
            let index = value as usize;
            if index >= len {
                return Err(SparseError::IndexOutOfRange { index, len });
            }
            if !seen.insert(index) {
                return Err(SparseError::DuplicateIndex(index));
            }
            Ok(index)
        })
        .collect()
}

/// Reads an index-encoded observation without checking for repeats.
///
/// For observations that come straight from a tile coder, which never
/// repeats an index. Each entry is still checked to be a whole number below
/// `len`.
///
/// # Errors
///
/// Fails if an entry is negative, fractional or `>= len`.
pub fn active_indices(observation: &[f64], len: usize) -> Result<Vec<usize>, SparseError> {
    observation
        .iter()
        .enumerate()
        .map(|(position, &value)| {
            if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
                return Err(SparseError::NonBinaryValue { position, value });
            }
            let index = value as usize;
            if index >= len {
                return Err(SparseError::IndexOutOfRange { index, len });
            }
            Ok(index)
        })
        .collect()
}
