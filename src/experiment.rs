//! Agent-environment interaction loop and episode statistics.

use std::fmt;

use log::info;

use crate::agents::{Agent, Transition};
use crate::environment::Environment;

/// Outcome of a single episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStats {
    /// Undiscounted sum of rewards.
    pub total_reward: f64,
    /// Number of steps taken.
    pub steps: usize,
    /// Whether the episode ended in a terminal state.
    pub terminated: bool,
}

/// Runs one episode, letting the agent learn from every transition.
///
/// The episode ends on termination, truncation, or after `max_steps` steps.
pub fn run_episode<E, A>(env: &mut E, agent: &mut A, max_steps: usize) -> EpisodeStats
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    let mut obs = env.reset();
    let mut stats = EpisodeStats {
        total_reward: 0.0,
        steps: 0,
        terminated: false,
    };

    while stats.steps < max_steps {
        let action = agent.select_action(&obs);
        let result = env.step(action);
        agent.observe(&Transition {
            observation: &obs,
            action,
            reward: result.reward,
            next_observation: &result.observation,
            terminated: result.terminated,
        });

        stats.total_reward += result.reward;
        stats.steps += 1;
        stats.terminated = result.terminated;
        let done = result.done();
        obs = result.observation;

        if done {
            break;
        }
    }

    stats
}

/// Repeated episodes of one agent in one environment.
#[derive(Debug, Clone)]
pub struct Experiment {
    /// Hard cap on episode length, on top of any environment limit.
    pub max_steps_per_episode: usize,
    /// Log progress every this many episodes (0 disables logging).
    pub log_every: usize,
}

impl Default for Experiment {
    fn default() -> Self {
        Self {
            max_steps_per_episode: 10_000,
            log_every: 10,
        }
    }
}

impl Experiment {
    /// Runs `episodes` episodes and returns their statistics in order.
    pub fn run<E, A>(&self, env: &mut E, agent: &mut A, episodes: usize) -> Vec<EpisodeStats>
    where
        E: Environment + ?Sized,
        A: Agent + ?Sized,
    {
        let mut history = Vec::with_capacity(episodes);
        for episode in 0..episodes {
            let stats = run_episode(env, agent, self.max_steps_per_episode);
            history.push(stats);

            if self.log_every > 0 && (episode + 1) % self.log_every == 0 {
                let window = &history[history.len() - self.log_every..];
                let mean = window.iter().map(|s| s.total_reward).sum::<f64>() / window.len() as f64;
                info!(
                    "[{} / {}] episode {}/{} mean_return={:.2} last_steps={}",
                    agent.name(),
                    env.name(),
                    episode + 1,
                    episodes,
                    mean,
                    stats.steps
                );
            }
        }
        history
    }
}

/// Aggregate statistics over a set of episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    pub mean_return: f64,
    pub min_return: f64,
    pub max_return: f64,
    pub mean_steps: f64,
    /// Fraction of episodes that reached a terminal state.
    pub success_rate: f64,
    pub n_episodes: usize,
}

impl EvaluationSummary {
    /// Summarizes `episodes`; returns `None` if there are none.
    pub fn from_episodes(episodes: &[EpisodeStats]) -> Option<Self> {
        if episodes.is_empty() {
            return None;
        }
        let n = episodes.len() as f64;
        let returns = episodes.iter().map(|e| e.total_reward);
        Some(Self {
            mean_return: returns.clone().sum::<f64>() / n,
            min_return: returns.clone().fold(f64::INFINITY, f64::min),
            max_return: returns.fold(f64::NEG_INFINITY, f64::max),
            mean_steps: episodes.iter().map(|e| e.steps as f64).sum::<f64>() / n,
            success_rate: episodes.iter().filter(|e| e.terminated).count() as f64 / n,
            n_episodes: episodes.len(),
        })
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Evaluation ({} episodes) ===", self.n_episodes)?;
        writeln!(f, "  Mean return:   {:.2}", self.mean_return)?;
        writeln!(
            f,
            "  Return range:  [{:.2}, {:.2}]",
            self.min_return, self.max_return
        )?;
        writeln!(f, "  Mean steps:    {:.1}", self.mean_steps)?;
        writeln!(f, "  Success rate:  {:.1}%", self.success_rate * 100.0)
    }
}
