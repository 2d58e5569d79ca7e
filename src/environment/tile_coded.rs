//! Environment wrapper that tile-codes every observation.

use std::sync::Arc;

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{BoxSpec, Environment, EnvironmentError, StepResult};
use crate::config::TileCodingConfig;
use crate::tile_coding::TileCoder;

/// How tile-coded observations are handed to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Encoding {
    /// Dense binary vector of length `vec_len`.
    #[default]
    Dense,
    /// The active feature indices, stored as `f64`.
    Indices,
}

/// Wraps an [`Environment`] so that its observations are tile-coded.
///
/// The wrapped observation spec describes the encoded output, not the
/// inner continuous bounds:
///
/// | Encoding  | Length               | Bounds               |
/// |-----------|----------------------|----------------------|
/// | `Dense`   | `vec_len`            | `[0, 1]`             |
/// | `Indices` | `num_tilings (+1)`   | `[0, vec_len - 1]`   |
///
/// Observations outside the inner bounds are clamped into the boundary tiles
/// by the coder. The first time that happens the wrapper logs a warning, as
/// it usually means the inner spec understates the real observation range.
#[derive(Debug)]
pub struct TileCodedEnv<E> {
    inner: E,
    coder: Arc<TileCoder>,
    encoding: Encoding,
    spec: BoxSpec,
    warned_out_of_bounds: bool,
}

impl<E: Environment> TileCodedEnv<E> {
    /// Wraps `inner`, tiling its observation bounds.
    ///
    /// # Arguments
    ///
    /// * `inner` - Environment to wrap
    /// * `tile_counts` - `[tiling][dimension]` number of tiles
    /// * `seed` - Seed for the tiling offsets
    /// * `include_bias_unit` - Add an always-active bias feature
    /// * `encoding` - Dense or index observations
    ///
    /// # Errors
    ///
    /// Fails if the tile coder cannot be built over the inner bounds (for
    /// example, unbounded dimensions or mismatched tile counts).
    pub fn new(
        inner: E,
        tile_counts: Vec<Vec<usize>>,
        seed: u64,
        include_bias_unit: bool,
        encoding: Encoding,
    ) -> Result<Self, EnvironmentError> {
        let bounds = inner.observation_spec();
        let coder = TileCoder::new(
            bounds.low().to_vec(),
            bounds.high().to_vec(),
            tile_counts,
            seed,
            include_bias_unit,
        )?;
        Self::with_coder(inner, Arc::new(coder), encoding)
    }

    /// Wraps `inner` with a coder built from `config`.
    pub fn from_config(
        inner: E,
        config: &TileCodingConfig,
        encoding: Encoding,
    ) -> Result<Self, EnvironmentError> {
        let coder = config.build()?;
        Self::with_coder(inner, Arc::new(coder), encoding)
    }

    /// Wraps `inner` with an existing, possibly shared, coder.
    pub fn with_coder(
        inner: E,
        coder: Arc<TileCoder>,
        encoding: Encoding,
    ) -> Result<Self, EnvironmentError> {
        let env_dims = inner.observation_spec().len();
        if coder.dimension_count() != env_dims {
            return Err(EnvironmentError::CoderDimensionMismatch {
                coder: coder.dimension_count(),
                env: env_dims,
            });
        }

        let spec = match encoding {
            Encoding::Dense => BoxSpec::uniform(coder.vec_len(), 0.0, 1.0)?,
            Encoding::Indices => {
                BoxSpec::uniform(coder.active_count(), 0.0, (coder.vec_len() - 1) as f64)?
            }
        };
        debug!("wrapping {} with {} ({:?})", inner.name(), coder, encoding);

        Ok(Self {
            inner,
            coder,
            encoding,
            spec,
            warned_out_of_bounds: false,
        })
    }

    pub fn coder(&self) -> &Arc<TileCoder> {
        &self.coder
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    /// Returns `true` exactly once per wrapper: for the first observation that
    /// falls outside the coder's bounds.
    fn first_out_of_bounds(&mut self, obs: &[f64]) -> bool {
        if self.warned_out_of_bounds || self.coder.in_bounds(obs) {
            return false;
        }
        self.warned_out_of_bounds = true;
        true
    }

    fn encode(&mut self, obs: &[f64]) -> Vec<f64> {
        if self.first_out_of_bounds(obs) {
            warn!(
                "{}: observation {:?} outside tile coder bounds, clamping",
                self.inner.name(),
                obs
            );
        }

        match self.encoding {
            Encoding::Dense => self.coder.encode(obs),
            Encoding::Indices => self
                .coder
                .encode_indices(obs)
                .into_iter()
                .map(|i| i as f64)
                .collect(),
        }
    }
}

impl<E: Environment> Environment for TileCodedEnv<E> {
    fn observation_spec(&self) -> &BoxSpec {
        &self.spec
    }

    fn action_count(&self) -> usize {
        self.inner.action_count()
    }

    fn reset(&mut self) -> Vec<f64> {
        let obs = self.inner.reset();
        self.encode(&obs)
    }

    fn step(&mut self, action: usize) -> StepResult {
        let result = self.inner.step(action);
        StepResult {
            observation: self.encode(&result.observation),
            ..result
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
