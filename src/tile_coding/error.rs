use thiserror::Error;

/// Errors raised while building a [`TileCoder`](super::TileCoder).
///
/// These are configuration mistakes: they are detected once, at construction,
/// and the coder is never built in a partially valid state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TileCodingError {
    #[error("Bound length mismatch: min bound has {min} dimensions, max bound has {max}")]
    BoundLengthMismatch { min: usize, max: usize },

    #[error("At least one tiling is required")]
    NoTilings,

    #[error("Tiling {tiling} has {found} tile counts, expected {expected} (one per dimension)")]
    TilingDimensionMismatch {
        tiling: usize,
        expected: usize,
        found: usize,
    },

    #[error("Tiling {tiling} has zero tiles along dimension {dimension}")]
    ZeroTileCount { tiling: usize, dimension: usize },

    #[error("Invalid bounds for dimension {dimension}: [{min}, {max}]")]
    InvalidBounds { dimension: usize, min: f64, max: f64 },

    #[error("Offset table shape does not match tile counts at tiling {tiling}")]
    OffsetShapeMismatch { tiling: usize },

    #[error("Tiling {tiling} has a non-positive or non-finite tile width {width} along dimension {dimension}")]
    DegenerateTileWidth {
        tiling: usize,
        dimension: usize,
        width: f64,
    },

    #[error("Total number of tiles does not fit in usize")]
    FeatureCountOverflow,
}

/// Errors raised when converting between dense and index representations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SparseError {
    #[error("Value {value} at position {position} is not binary")]
    NonBinaryValue { position: usize, value: f64 },

    #[error("Index {index} is out of range for a vector of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Index {0} appears more than once")]
    DuplicateIndex(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_length_mismatch_display() {
        let e = TileCodingError::BoundLengthMismatch { min: 2, max: 3 };
        assert_eq!(
            e.to_string(),
            "Bound length mismatch: min bound has 2 dimensions, max bound has 3"
        );
    }

    #[test]
    fn no_tilings_display() {
        assert_eq!(
            TileCodingError::NoTilings.to_string(),
            "At least one tiling is required"
        );
    }

    #[test]
    fn zero_tile_count_display() {
        let e = TileCodingError::ZeroTileCount {
            tiling: 1,
            dimension: 0,
        };
        assert!(e.to_string().contains("zero tiles"));
    }

    #[test]
    fn degenerate_width_display() {
        let e = TileCodingError::DegenerateTileWidth {
            tiling: 0,
            dimension: 2,
            width: f64::INFINITY,
        };
        assert_eq!(
            e.to_string(),
            "Tiling 0 has a non-positive or non-finite tile width inf along dimension 2"
        );
    }

    #[test]
    fn non_binary_display() {
        let e = SparseError::NonBinaryValue {
            position: 4,
            value: 0.5,
        };
        assert_eq!(e.to_string(), "Value 0.5 at position 4 is not binary");
    }

    #[test]
    fn error_equality() {
        assert_eq!(TileCodingError::NoTilings, TileCodingError::NoTilings);
        assert_ne!(
            SparseError::DuplicateIndex(1),
            SparseError::DuplicateIndex(2)
        );
    }
}
