//! Fixed-capacity trajectory buffer with GAE-λ advantage estimation.

use thiserror::Error;

use super::gae::{compute_gae, discount_cumsum};

/// Errors raised by [`TrajectoryBuffer`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Trajectory buffer is full (capacity {capacity})")]
    Full { capacity: usize },

    #[error("Cannot take a batch while a path is unfinished ({pending} pending steps)")]
    UnfinishedPath { pending: usize },
}

/// A batch of finished paths, ready for a policy-gradient update.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryBatch {
    pub observations: Vec<Vec<f64>>,
    pub actions: Vec<usize>,
    /// GAE-λ advantages, normalised to zero mean and unit variance.
    pub advantages: Vec<f64>,
    /// Discounted rewards-to-go, the critic's regression targets.
    pub returns: Vec<f64>,
    pub log_probs: Vec<f64>,
}

impl TrajectoryBatch {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Stores agent-environment steps and turns them into advantage estimates.
///
/// # Lifecycle
///
/// 1. [`store`](Self::store) each step of the current path.
/// 2. When the path ends (termination, truncation, or the buffer filling
///    up), call [`finish_path`](Self::finish_path) with the bootstrap value:
///    `0` for a terminal state, the critic's estimate otherwise.
/// 3. [`take`](Self::take) the batch; the buffer is emptied.
#[derive(Debug)]
pub struct TrajectoryBuffer {
    capacity: usize,
    gamma: f64,
    gae_lambda: f64,
    observations: Vec<Vec<f64>>,
    actions: Vec<usize>,
    rewards: Vec<f64>,
    values: Vec<f64>,
    log_probs: Vec<f64>,
    advantages: Vec<f64>,
    returns: Vec<f64>,
    /// First step of the path currently being collected.
    path_start: usize,
}

impl TrajectoryBuffer {
    /// Creates an empty buffer holding at most `capacity` steps.
    pub fn new(capacity: usize, gamma: f64, gae_lambda: f64) -> Self {
        Self {
            capacity,
            gamma,
            gae_lambda,
            observations: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            log_probs: Vec::with_capacity(capacity),
            advantages: Vec::with_capacity(capacity),
            returns: Vec::with_capacity(capacity),
            path_start: 0,
        }
    }

    /// Appends one step to the current path.
    pub fn store(
        &mut self,
        observation: Vec<f64>,
        action: usize,
        reward: f64,
        value: f64,
        log_prob: f64,
    ) -> Result<(), BufferError> {
        if self.is_full() {
            return Err(BufferError::Full {
                capacity: self.capacity,
            });
        }
        self.observations.push(observation);
        self.actions.push(action);
        self.rewards.push(reward);
        self.values.push(value);
        self.log_probs.push(log_prob);
        Ok(())
    }

    /// Closes the current path, computing its advantages and rewards-to-go.
    ///
    /// `last_value` bootstraps the tail of a path that was cut off; pass `0`
    /// when the path ended in a terminal state. Finishing an empty path is a
    /// no-op.
    pub fn finish_path(&mut self, last_value: f64) {
        let path = self.path_start..self.len();
        if path.is_empty() {
            return;
        }

        let rewards = &self.rewards[path.clone()];
        let dones = vec![false; rewards.len()];
        let (advantages, _) = compute_gae(
            rewards,
            &self.values[path],
            &dones,
            last_value,
            self.gamma,
            self.gae_lambda,
        );

        let mut padded = rewards.to_vec();
        padded.push(last_value);
        let mut returns = discount_cumsum(&padded, self.gamma);
        returns.pop();

        self.advantages.extend(advantages);
        self.returns.extend(returns);
        self.path_start = self.len();
    }

    /// Returns every finished step and empties the buffer.
    pub fn take(&mut self) -> Result<TrajectoryBatch, BufferError> {
        let pending = self.len() - self.path_start;
        if pending > 0 {
            return Err(BufferError::UnfinishedPath { pending });
        }

        let mut advantages = std::mem::take(&mut self.advantages);
        normalize(&mut advantages);
        let batch = TrajectoryBatch {
            observations: std::mem::take(&mut self.observations),
            actions: std::mem::take(&mut self.actions),
            advantages,
            returns: std::mem::take(&mut self.returns),
            log_probs: std::mem::take(&mut self.log_probs),
        };
        self.rewards.clear();
        self.values.clear();
        self.path_start = 0;
        Ok(batch)
    }

    /// Number of stored steps, finished or not.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Normalizes advantages to zero mean and unit variance.
fn normalize(advantages: &mut [f64]) {
    if advantages.is_empty() {
        return;
    }
    let n = advantages.len() as f64;
    let mean: f64 = advantages.iter().sum::<f64>() / n;
    let var: f64 = advantages.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;
    let std = (var + 1e-8).sqrt();
    for a in advantages.iter_mut() {
        *a = (*a - mean) / std;
    }
}
