//! Agents that learn from tile-coded observations.

pub mod linear;
pub mod random;

pub use linear::LinearAgent;
pub use random::RandomAgent;

/// One observed environment transition.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub observation: &'a [f64],
    pub action: usize,
    pub reward: f64,
    pub next_observation: &'a [f64],
    /// Terminal transitions do not bootstrap from `next_observation`.
    pub terminated: bool,
}

/// An agent that selects discrete actions and learns from transitions.
pub trait Agent {
    /// Selects an action for `observation`.
    fn select_action(&mut self, observation: &[f64]) -> usize;

    /// Learns from a transition. Non-learning agents ignore it.
    fn observe(&mut self, transition: &Transition<'_>);

    /// Returns a human-readable name for this agent.
    fn name(&self) -> &str;
}
