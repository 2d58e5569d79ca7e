//! Environments and the tile-coding observation wrapper.
//!
//! An [`Environment`] exposes continuous observations described by a
//! [`BoxSpec`] and accepts discrete actions. [`TileCodedEnv`] wraps any
//! environment so that agents only ever see tile-coded features.

pub mod error;
pub mod mountain_car;
pub mod spec;
pub mod tile_coded;

pub use error::EnvironmentError;
pub use mountain_car::MountainCar;
pub use spec::BoxSpec;
pub use tile_coded::{Encoding, TileCodedEnv};

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Observation after the step.
    pub observation: Vec<f64>,
    /// Reward for the transition.
    pub reward: f64,
    /// The episode reached a terminal state.
    pub terminated: bool,
    /// The episode was cut short (e.g. step limit).
    pub truncated: bool,
}

impl StepResult {
    /// Whether the episode is over for either reason.
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// An episodic environment with continuous observations and discrete actions.
///
/// # Lifecycle
///
/// 1. Call [`Environment::reset`] to start an episode.
/// 2. Call [`Environment::step`] until [`StepResult::done`] is `true`.
pub trait Environment {
    /// Bounds of every observation this environment emits.
    fn observation_spec(&self) -> &BoxSpec;

    /// Number of discrete actions; valid actions are `0..action_count()`.
    fn action_count(&self) -> usize;

    /// Starts a new episode and returns the first observation.
    fn reset(&mut self) -> Vec<f64>;

    /// Applies `action` and advances the environment by one step.
    fn step(&mut self, action: usize) -> StepResult;

    /// Short name for logs.
    fn name(&self) -> &str;
}
