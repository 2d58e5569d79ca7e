//! Tile coding: sparse binary features for bounded continuous spaces.
//!
//! [`TileCoder`] is the core type. [`sparse`] converts between its dense and
//! index outputs.

pub mod coder;
pub mod error;
pub mod sparse;

#[cfg(test)]
mod tests;

pub use coder::{Result, TileCoder, BIAS_INDEX};
pub use error::{SparseError, TileCodingError};
pub use sparse::{active_indices, dense_to_indices, indices_to_dense, observation_indices};
