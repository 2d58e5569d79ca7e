//! Random agent for testing and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Agent, Transition};

/// Uniformly random action selection.
///
/// Used for sanity checks and as a lower-bound baseline.
#[derive(Debug)]
pub struct RandomAgent {
    action_count: usize,
    rng: StdRng,
}

impl RandomAgent {
    /// Creates a random agent choosing from `0..action_count`.
    pub fn new(action_count: usize, seed: u64) -> Self {
        assert!(action_count > 0, "Random agent needs at least one action");
        Self {
            action_count,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, _observation: &[f64]) -> usize {
        self.rng.gen_range(0..self.action_count)
    }

    fn observe(&mut self, _transition: &Transition<'_>) {}

    fn name(&self) -> &str {
        "random"
    }
}
