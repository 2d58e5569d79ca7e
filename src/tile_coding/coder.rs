//! Randomized multi-tiling tile coder.
//!
//! Maps a bounded continuous vector space onto a sparse binary feature vector
//! with exactly one active tile per tiling (plus an optional bias unit).
//!
//! # Layout of the feature vector
//!
//! ```text
//! [bias?] ++ [tiling_0 tiles] ++ [tiling_1 tiles] ++ ... ++ [tiling_{n-1} tiles]
//! ```
//!
//! Inside a tiling, tiles are laid out row-major over the dimensions: the last
//! dimension varies fastest.

use std::fmt;

use log::debug;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::error::TileCodingError;

/// Result type for tile coder construction.
pub type Result<T> = std::result::Result<T, TileCodingError>;

/// Position of the always-active bias feature, when enabled.
pub const BIAS_INDEX: usize = 0;

/// Offsets are drawn from `[-width / OFFSET_DIVISOR, width / OFFSET_DIVISOR]`.
const OFFSET_DIVISOR: f64 = 1.5;

/// Below this many tilings the per-tiling work is done on the calling thread.
const PARALLEL_MIN_TILINGS: usize = 16;

/// A dense multi-tiling tile coder over a bounded box.
///
/// The coder is immutable once built, so a single instance can be shared
/// across threads and queried concurrently without locking.
///
/// # Example
///
/// ```
/// use tilerl::tile_coding::TileCoder;
///
/// let coder = TileCoder::new(
///     vec![0.0, 0.0],
///     vec![1.0, 1.0],
///     vec![vec![4, 4], vec![4, 4]],
///     7,
///     false,
/// )
/// .unwrap();
///
/// assert_eq!(coder.vec_len(), 32);
/// assert_eq!(coder.encode_indices(&[0.3, 0.6]).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TileCoder {
    min_bound: Vec<f64>,
    max_bound: Vec<f64>,
    /// `[tiling][dimension]` number of tiles.
    tile_counts: Vec<Vec<usize>>,
    /// `[tiling][dimension]` tile width, always positive.
    tile_widths: Vec<Vec<f64>>,
    /// `[tiling][dimension]` displacement added to inputs before indexing.
    offsets: Vec<Vec<f64>>,
    /// First feature index of each tiling, bias shift included.
    tiling_starts: Vec<usize>,
    include_bias_unit: bool,
    vec_len: usize,
}

impl TileCoder {
    /// Builds a tile coder with randomly jittered tilings.
    ///
    /// One offset per tiling and dimension is drawn uniformly from
    /// `[-w / 1.5, w / 1.5]`, where `w` is that tiling's tile width along the
    /// dimension. All draws come from a generator seeded with `seed`, so equal
    /// arguments always produce equal coders.
    ///
    /// # Arguments
    ///
    /// * `min_bound` - Lower bound of every dimension
    /// * `max_bound` - Upper bound of every dimension
    /// * `tile_counts` - `[tiling][dimension]` number of tiles
    /// * `seed` - Seed for the offset generator
    /// * `include_bias_unit` - Reserve feature 0 as an always-active bias
    ///
    /// # Errors
    ///
    /// Returns a [`TileCodingError`] if the bounds and tile counts do not
    /// describe a valid space.
    pub fn new(
        min_bound: Vec<f64>,
        max_bound: Vec<f64>,
        tile_counts: Vec<Vec<usize>>,
        seed: u64,
        include_bias_unit: bool,
    ) -> Result<Self> {
        validate(&min_bound, &max_bound, &tile_counts)?;
        let tile_widths = tile_widths(&min_bound, &max_bound, &tile_counts)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let offsets = tile_widths
            .iter()
            .map(|widths| {
                widths
                    .iter()
                    .map(|w| {
                        let half_range = w / OFFSET_DIVISOR;
                        rng.gen_range(-half_range..=half_range)
                    })
                    .collect()
            })
            .collect();

        let coder = Self::assemble(
            min_bound,
            max_bound,
            tile_counts,
            tile_widths,
            offsets,
            include_bias_unit,
        )?;
        debug!("built {} (seed {})", coder, seed);
        Ok(coder)
    }

    /// Builds a tile coder with caller-supplied offsets instead of random ones.
    ///
    /// `offsets` must have the same `[tiling][dimension]` shape as
    /// `tile_counts`. Passing all zeros aligns every tiling with `min_bound`.
    pub fn with_offsets(
        min_bound: Vec<f64>,
        max_bound: Vec<f64>,
        tile_counts: Vec<Vec<usize>>,
        offsets: Vec<Vec<f64>>,
        include_bias_unit: bool,
    ) -> Result<Self> {
        validate(&min_bound, &max_bound, &tile_counts)?;
        if offsets.len() != tile_counts.len() {
            return Err(TileCodingError::OffsetShapeMismatch {
                tiling: offsets.len().min(tile_counts.len()),
            });
        }
        if let Some(tiling) = offsets
            .iter()
            .position(|row| row.len() != min_bound.len() || row.iter().any(|o| !o.is_finite()))
        {
            return Err(TileCodingError::OffsetShapeMismatch { tiling });
        }

        let tile_widths = tile_widths(&min_bound, &max_bound, &tile_counts)?;
        let coder = Self::assemble(
            min_bound,
            max_bound,
            tile_counts,
            tile_widths,
            offsets,
            include_bias_unit,
        )?;
        debug!("built {} with fixed offsets", coder);
        Ok(coder)
    }

    fn assemble(
        min_bound: Vec<f64>,
        max_bound: Vec<f64>,
        tile_counts: Vec<Vec<usize>>,
        tile_widths: Vec<Vec<f64>>,
        offsets: Vec<Vec<f64>>,
        include_bias_unit: bool,
    ) -> Result<Self> {
        let mut next = usize::from(include_bias_unit);
        let mut tiling_starts = Vec::with_capacity(tile_counts.len());
        for counts in &tile_counts {
            tiling_starts.push(next);
            next = counts
                .iter()
                .try_fold(1usize, |acc, &c| acc.checked_mul(c))
                .and_then(|tiles| next.checked_add(tiles))
                .ok_or(TileCodingError::FeatureCountOverflow)?;
        }

        Ok(Self {
            min_bound,
            max_bound,
            tile_counts,
            tile_widths,
            offsets,
            tiling_starts,
            include_bias_unit,
            vec_len: next,
        })
    }

    /// Length of every dense encoding.
    pub fn vec_len(&self) -> usize {
        self.vec_len
    }

    /// Number of tilings.
    pub fn num_tilings(&self) -> usize {
        self.tile_counts.len()
    }

    /// Number of continuous dimensions an input vector must have.
    pub fn dimension_count(&self) -> usize {
        self.min_bound.len()
    }

    /// Number of features active in every encoding.
    pub fn active_count(&self) -> usize {
        self.num_tilings() + usize::from(self.include_bias_unit)
    }

    pub fn include_bias_unit(&self) -> bool {
        self.include_bias_unit
    }

    pub fn min_bound(&self) -> &[f64] {
        &self.min_bound
    }

    pub fn max_bound(&self) -> &[f64] {
        &self.max_bound
    }

    pub fn tile_counts(&self) -> &[Vec<usize>] {
        &self.tile_counts
    }

    pub fn tile_widths(&self) -> &[Vec<f64>] {
        &self.tile_widths
    }

    pub fn offsets(&self) -> &[Vec<f64>] {
        &self.offsets
    }

    /// Returns `true` if every component of `v` lies within the coder's bounds.
    ///
    /// Encoding never requires this; values outside are clamped into the
    /// boundary tiles.
    pub fn in_bounds(&self, v: &[f64]) -> bool {
        v.iter()
            .zip(self.min_bound.iter().zip(&self.max_bound))
            .all(|(x, (lo, hi))| lo <= x && x <= hi)
    }

    /// Encodes `v` as a dense binary feature vector of length [`vec_len`](Self::vec_len).
    ///
    /// Exactly [`active_count`](Self::active_count) entries are `1.0`.
    ///
    /// # Panics
    ///
    /// Panics if `v.len()` differs from [`dimension_count`](Self::dimension_count).
    pub fn encode(&self, v: &[f64]) -> Vec<f64> {
        let mut dense = vec![0.0; self.vec_len];
        for i in self.encode_indices(v) {
            dense[i] = 1.0;
        }
        dense
    }

    /// Returns the positions that [`encode`](Self::encode) would set to `1.0`.
    ///
    /// The bias index (if any) comes first, followed by one index per tiling
    /// in tiling order. With many tilings the per-tiling work fans out over
    /// the rayon pool and is joined before returning.
    ///
    /// # Panics
    ///
    /// Panics if `v.len()` differs from [`dimension_count`](Self::dimension_count).
    pub fn encode_indices(&self, v: &[f64]) -> Vec<usize> {
        self.check_len(v);

        let mut indices = Vec::with_capacity(self.active_count());
        if self.include_bias_unit {
            indices.push(BIAS_INDEX);
        }

        let tilings = 0..self.num_tilings();
        if self.num_tilings() >= PARALLEL_MIN_TILINGS {
            indices.par_extend(tilings.into_par_iter().map(|t| self.feature_index(t, v)));
        } else {
            indices.extend(tilings.map(|t| self.feature_index(t, v)));
        }
        indices
    }

    /// Encodes every column of `batch` (shape `dimension_count x samples`).
    ///
    /// Returns a `vec_len x samples` matrix whose column `i` equals
    /// `encode(batch.column(i))`.
    ///
    /// # Panics
    ///
    /// Panics if `batch.nrows()` differs from [`dimension_count`](Self::dimension_count).
    pub fn encode_batch(&self, batch: &Array2<f64>) -> Array2<f64> {
        assert_eq!(
            batch.nrows(),
            self.dimension_count(),
            "Batch rows must match the tile coder's dimension count"
        );

        let samples: Vec<Vec<f64>> = batch.columns().into_iter().map(|c| c.to_vec()).collect();
        let active: Vec<Vec<usize>> = samples
            .par_iter()
            .map(|sample| self.encode_indices(sample))
            .collect();

        let mut encoded = Array2::zeros((self.vec_len, samples.len()));
        for (col, indices) in active.iter().enumerate() {
            for &row in indices {
                encoded[[row, col]] = 1.0;
            }
        }
        encoded
    }

    /// Global feature index of the tile that `v` activates in `tiling`.
    fn feature_index(&self, tiling: usize, v: &[f64]) -> usize {
        self.tiling_starts[tiling] + self.tile_index(tiling, v)
    }

    /// Row-major flat index of the active tile within `tiling`.
    fn tile_index(&self, tiling: usize, v: &[f64]) -> usize {
        let counts = &self.tile_counts[tiling];
        let widths = &self.tile_widths[tiling];
        let offsets = &self.offsets[tiling];

        v.iter().enumerate().fold(0, |flat, (d, &x)| {
            let shifted = x + offsets[d];
            let raw = ((shifted - self.min_bound[d]) / widths[d]).floor();
            let last = counts[d] - 1;
            // NaN fails both comparisons and saturates to 0 on the cast.
            let index = if raw >= last as f64 {
                last
            } else if raw > 0.0 {
                raw as usize
            } else {
                0
            };
            flat * counts[d] + index
        })
    }

    fn check_len(&self, v: &[f64]) {
        assert_eq!(
            v.len(),
            self.dimension_count(),
            "Input vector length must match the tile coder's dimension count"
        );
    }
}

impl fmt::Display for TileCoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TileCoder(tilings: {}, tiles: {:?}, bias: {})",
            self.num_tilings(),
            self.tile_counts,
            self.include_bias_unit
        )
    }
}

fn validate(min_bound: &[f64], max_bound: &[f64], tile_counts: &[Vec<usize>]) -> Result<()> {
    if min_bound.len() != max_bound.len() {
        return Err(TileCodingError::BoundLengthMismatch {
            min: min_bound.len(),
            max: max_bound.len(),
        });
    }

    for (dimension, (&min, &max)) in min_bound.iter().zip(max_bound).enumerate() {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(TileCodingError::InvalidBounds {
                dimension,
                min,
                max,
            });
        }
    }

    if tile_counts.is_empty() {
        return Err(TileCodingError::NoTilings);
    }

    for (tiling, counts) in tile_counts.iter().enumerate() {
        if counts.len() != min_bound.len() {
            return Err(TileCodingError::TilingDimensionMismatch {
                tiling,
                expected: min_bound.len(),
                found: counts.len(),
            });
        }
        if let Some(dimension) = counts.iter().position(|&c| c == 0) {
            return Err(TileCodingError::ZeroTileCount { tiling, dimension });
        }
    }

    Ok(())
}

/// Tile widths per tiling and dimension. Each must be finite and positive,
/// which rules out spans that overflow or tiles too narrow to represent.
fn tile_widths(
    min_bound: &[f64],
    max_bound: &[f64],
    tile_counts: &[Vec<usize>],
) -> Result<Vec<Vec<f64>>> {
    tile_counts
        .iter()
        .enumerate()
        .map(|(tiling, counts)| {
            counts
                .iter()
                .enumerate()
                .map(|(dimension, &c)| {
                    let width = (max_bound[dimension] - min_bound[dimension]) / c as f64;
                    if width.is_finite() && width > 0.0 {
                        Ok(width)
                    } else {
                        Err(TileCodingError::DegenerateTileWidth {
                            tiling,
                            dimension,
                            width,
                        })
                    }
                })
                .collect()
        })
        .collect()
}
