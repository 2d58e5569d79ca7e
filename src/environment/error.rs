use thiserror::Error;

use crate::tile_coding::TileCodingError;

/// Errors raised while assembling environments and wrappers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EnvironmentError {
    #[error("Observation bounds have different lengths: low {low}, high {high}")]
    SpecShapeMismatch { low: usize, high: usize },

    #[error("Observation bounds are inverted at dimension {dimension}")]
    InvertedSpec { dimension: usize },

    #[error("Tile coder expects {coder} dimensions but the environment observes {env}")]
    CoderDimensionMismatch { coder: usize, env: usize },

    #[error("Failed to build tile coder: {0}")]
    TileCoding(#[from] TileCodingError),
}
