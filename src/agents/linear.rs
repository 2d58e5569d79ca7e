//! Linear action-value learning over tile-coded features.
//!
//! Each action owns a weight vector; `q(s, a) = w_a · x(s)`. With index
//! observations only the weights of the active features are read or written,
//! which is what makes tile coding cheap for linear learners.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Agent, Transition};
use crate::config::{LinearAgentConfig, TargetKind};
use crate::environment::{Encoding, Environment, TileCodedEnv};
use crate::tile_coding::active_indices;

/// Feature view of one observation.
enum Features<'a> {
    Dense(&'a [f64]),
    Active(Vec<usize>),
}

impl Features<'_> {
    fn dot(&self, weights: &[f64]) -> f64 {
        match self {
            Features::Dense(x) => x.iter().zip(weights).map(|(xi, wi)| xi * wi).sum(),
            Features::Active(active) => active.iter().map(|&i| weights[i]).sum(),
        }
    }

    /// Squared norm of the feature vector.
    fn norm_sq(&self) -> f64 {
        match self {
            Features::Dense(x) => x.iter().map(|xi| xi * xi).sum(),
            Features::Active(active) => active.len() as f64,
        }
    }

    /// `weights += scale * x`.
    fn add_to(&self, weights: &mut [f64], scale: f64) {
        match self {
            Features::Dense(x) => {
                for (wi, xi) in weights.iter_mut().zip(x.iter()) {
                    *wi += scale * xi;
                }
            }
            Features::Active(active) => {
                for &i in active {
                    weights[i] += scale;
                }
            }
        }
    }
}

/// Epsilon-greedy linear Q-learning / Expected Sarsa agent.
///
/// The step size is normalised by the squared norm of the feature vector,
/// so for tile-coded input it is effectively divided by the number of
/// active tiles.
#[derive(Debug)]
pub struct LinearAgent {
    config: LinearAgentConfig,
    encoding: Encoding,
    feature_count: usize,
    /// `[action][feature]` weights.
    weights: Vec<Vec<f64>>,
    rng: StdRng,
}

impl LinearAgent {
    /// Creates an agent with all weights at zero.
    ///
    /// # Arguments
    ///
    /// * `feature_count` - Dense feature-vector length (`vec_len` of the coder)
    /// * `action_count` - Number of discrete actions
    /// * `encoding` - How observations passed to the agent are encoded
    /// * `config` - Learning hyperparameters
    pub fn new(
        feature_count: usize,
        action_count: usize,
        encoding: Encoding,
        config: LinearAgentConfig,
    ) -> Self {
        assert!(action_count > 0, "Linear agent needs at least one action");
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            encoding,
            feature_count,
            weights: vec![vec![0.0; feature_count]; action_count],
        }
    }

    /// Creates an agent sized for a tile-coded environment.
    pub fn for_env<E: Environment>(env: &TileCodedEnv<E>, config: LinearAgentConfig) -> Self {
        Self::new(
            env.coder().vec_len(),
            env.action_count(),
            env.encoding(),
            config,
        )
    }

    pub fn config(&self) -> &LinearAgentConfig {
        &self.config
    }

    pub fn action_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Action values `q(s, a)` for every action.
    pub fn action_values(&self, observation: &[f64]) -> Vec<f64> {
        let features = self.features(observation);
        self.weights.iter().map(|w| features.dot(w)).collect()
    }

    /// Probability of each action under the epsilon-greedy policy.
    ///
    /// Ties for the greedy action share the greedy mass equally.
    pub fn policy(&self, observation: &[f64]) -> Vec<f64> {
        epsilon_greedy(&self.action_values(observation), self.config.epsilon)
    }

    fn features<'a>(&self, observation: &'a [f64]) -> Features<'a> {
        match self.encoding {
            Encoding::Dense => {
                assert_eq!(
                    observation.len(),
                    self.feature_count,
                    "Dense observation length must match the agent's feature count"
                );
                Features::Dense(observation)
            }
            // Index observations come from a tile coder, so repeats are not checked.
            Encoding::Indices => match active_indices(observation, self.feature_count) {
                Ok(active) => Features::Active(active),
                Err(e) => panic!("Malformed index observation: {e}"),
            },
        }
    }

    fn bootstrap(&self, next_observation: &[f64]) -> f64 {
        let values = self.action_values(next_observation);
        match self.config.target {
            TargetKind::QLearning => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            TargetKind::ExpectedSarsa => epsilon_greedy(&values, self.config.epsilon)
                .iter()
                .zip(&values)
                .map(|(p, q)| p * q)
                .sum(),
        }
    }
}

impl Agent for LinearAgent {
    fn select_action(&mut self, observation: &[f64]) -> usize {
        let n = self.action_count();
        if self.rng.gen::<f64>() < self.config.epsilon {
            return self.rng.gen_range(0..n);
        }
        let greedy = greedy_actions(&self.action_values(observation));
        greedy[self.rng.gen_range(0..greedy.len())]
    }

    fn observe(&mut self, transition: &Transition<'_>) {
        let target = if transition.terminated {
            transition.reward
        } else {
            transition.reward + self.config.gamma * self.bootstrap(transition.next_observation)
        };

        let features = self.features(transition.observation);
        let weights = &mut self.weights[transition.action];
        let delta = target - features.dot(weights);

        let norm = features.norm_sq();
        let step = if norm > 0.0 {
            self.config.step_size / norm
        } else {
            self.config.step_size
        };
        features.add_to(weights, step * delta);
    }

    fn name(&self) -> &str {
        match self.config.target {
            TargetKind::QLearning => "linear-q-learning",
            TargetKind::ExpectedSarsa => "linear-expected-sarsa",
        }
    }
}

/// Indices of all actions sharing the maximum value.
fn greedy_actions(values: &[f64]) -> Vec<usize> {
    let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let greedy: Vec<usize> = (0..values.len()).filter(|&a| values[a] == best).collect();
    if greedy.is_empty() {
        // All NaN: fall back to every action.
        (0..values.len()).collect()
    } else {
        greedy
    }
}

fn epsilon_greedy(values: &[f64], epsilon: f64) -> Vec<f64> {
    let n = values.len() as f64;
    let greedy = greedy_actions(values);
    let mut probs = vec![epsilon / n; values.len()];
    let share = (1.0 - epsilon) / greedy.len() as f64;
    for a in greedy {
        probs[a] += share;
    }
    probs
}
