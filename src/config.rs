//! Configuration for tile coders and linear agents.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tile_coding::{Result, TileCoder};

/// Description of a tile coder, separate from the built coder itself.
///
/// Holds everything [`TileCoder::new`] needs so that a coder can be described
/// in a config file and rebuilt deterministically.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileCodingConfig {
    /// Lower bound of every dimension.
    pub min_bound: Vec<f64>,
    /// Upper bound of every dimension.
    pub max_bound: Vec<f64>,
    /// `[tiling][dimension]` number of tiles.
    pub tile_counts: Vec<Vec<usize>>,
    /// Seed for the tiling offsets.
    pub seed: u64,
    /// Reserve feature 0 as an always-active bias unit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub include_bias_unit: bool,
}

impl TileCodingConfig {
    /// Describes `num_tilings` identical tilings with `tiles_per_dim` tiles
    /// along every dimension.
    pub fn uniform(
        min_bound: Vec<f64>,
        max_bound: Vec<f64>,
        num_tilings: usize,
        tiles_per_dim: usize,
        seed: u64,
    ) -> Self {
        let tile_counts = vec![vec![tiles_per_dim; min_bound.len()]; num_tilings];
        Self {
            min_bound,
            max_bound,
            tile_counts,
            seed,
            include_bias_unit: false,
        }
    }

    /// Same configuration with the bias unit switched on or off.
    pub fn with_bias_unit(mut self, include_bias_unit: bool) -> Self {
        self.include_bias_unit = include_bias_unit;
        self
    }

    /// Feature-vector length the built coder will have.
    ///
    /// Saturates at `usize::MAX`; such a configuration fails to build.
    pub fn vec_len(&self) -> usize {
        self.tile_counts
            .iter()
            .map(|counts| counts.iter().fold(1usize, |acc, &c| acc.saturating_mul(c)))
            .fold(usize::from(self.include_bias_unit), usize::saturating_add)
    }

    /// Builds the tile coder.
    pub fn build(&self) -> Result<TileCoder> {
        TileCoder::new(
            self.min_bound.clone(),
            self.max_bound.clone(),
            self.tile_counts.clone(),
            self.seed,
            self.include_bias_unit,
        )
    }
}

/// Bootstrap target used by a [`LinearAgent`](crate::agents::LinearAgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetKind {
    /// Greedy bootstrap: `max_a q(s', a)`.
    QLearning,
    /// Expected bootstrap under the epsilon-greedy behaviour policy.
    ExpectedSarsa,
}

/// Hyperparameters for a linear action-value agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearAgentConfig {
    /// Learning rate. Each update divides it by the squared norm of the
    /// feature vector, which for binary tile features is the number of
    /// active features under either encoding.
    pub step_size: f64,
    /// Discount factor.
    pub gamma: f64,
    /// Exploration probability of the epsilon-greedy policy.
    pub epsilon: f64,
    /// Bootstrap target.
    pub target: TargetKind,
    /// Seed for action sampling.
    pub seed: u64,
}

impl Default for LinearAgentConfig {
    fn default() -> Self {
        Self {
            step_size: 0.5,
            gamma: 1.0,
            epsilon: 0.1,
            target: TargetKind::ExpectedSarsa,
            seed: 0,
        }
    }
}
