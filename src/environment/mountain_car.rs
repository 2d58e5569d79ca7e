//! Classic-control mountain car.
//!
//! An underpowered car in a valley must rock back and forth to build enough
//! momentum to reach the flag on the right hill.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{BoxSpec, Environment, StepResult};

const MIN_POSITION: f64 = -1.2;
const MAX_POSITION: f64 = 0.6;
const MAX_SPEED: f64 = 0.07;
const GOAL_POSITION: f64 = 0.5;
const FORCE: f64 = 0.001;
const GRAVITY: f64 = 0.0025;

/// Default episode length before truncation.
pub const DEFAULT_MAX_STEPS: u32 = 200;

/// Mountain car with three actions: push left (0), no push (1), push right (2).
///
/// Observations are `[position, velocity]`. Every step yields reward `-1`.
#[derive(Debug)]
pub struct MountainCar {
    spec: BoxSpec,
    position: f64,
    velocity: f64,
    steps: u32,
    max_steps: u32,
    rng: StdRng,
    /// Seed for the next reset.
    seed: u64,
}

impl MountainCar {
    /// Creates a mountain car with the default step limit.
    pub fn new(seed: u64) -> Self {
        Self::with_max_steps(seed, DEFAULT_MAX_STEPS)
    }

    pub fn with_max_steps(seed: u64, max_steps: u32) -> Self {
        Self {
            spec: BoxSpec::from_parts(
                vec![MIN_POSITION, -MAX_SPEED],
                vec![MAX_POSITION, MAX_SPEED],
            ),
            position: -0.5,
            velocity: 0.0,
            steps: 0,
            max_steps,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    fn observation(&self) -> Vec<f64> {
        vec![self.position, self.velocity]
    }
}

impl Environment for MountainCar {
    fn observation_spec(&self) -> &BoxSpec {
        &self.spec
    }

    fn action_count(&self) -> usize {
        3
    }

    /// Places the car at rest somewhere in `[-0.6, -0.4)`.
    ///
    /// Each reset reseeds from the stored seed and then advances it, so a
    /// fresh environment replays the same sequence of episodes.
    fn reset(&mut self) -> Vec<f64> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.seed = self.seed.wrapping_add(1);
        self.position = self.rng.gen_range(-0.6..-0.4);
        self.velocity = 0.0;
        self.steps = 0;
        self.observation()
    }

    fn step(&mut self, action: usize) -> StepResult {
        assert!(action < 3, "Mountain car action must be 0, 1 or 2");

        let push = action as f64 - 1.0;
        self.velocity += push * FORCE - (3.0 * self.position).cos() * GRAVITY;
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        self.position += self.velocity;
        self.position = self.position.clamp(MIN_POSITION, MAX_POSITION);
        if self.position == MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }
        self.steps += 1;

        let terminated = self.position >= GOAL_POSITION && self.velocity >= 0.0;
        StepResult {
            observation: self.observation(),
            reward: -1.0,
            terminated,
            truncated: !terminated && self.steps >= self.max_steps,
        }
    }

    fn name(&self) -> &str {
        "mountain-car"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_starts_at_rest_in_valley() {
        let mut env = MountainCar::new(42);
        let obs = env.reset();
        assert!((-0.6..-0.4).contains(&obs[0]));
        assert_eq!(obs[1], 0.0);
    }

    #[test]
    fn observations_stay_in_spec() {
        let mut env = MountainCar::new(1);
        env.reset();
        for t in 0..200 {
            let result = env.step(t % 3);
            assert!(env.observation_spec().contains(&result.observation));
            if result.done() {
                break;
            }
        }
    }

    #[test]
    fn truncates_at_step_limit() {
        let mut env = MountainCar::with_max_steps(3, 5);
        env.reset();
        for t in 0..5 {
            let result = env.step(1);
            assert_eq!(result.reward, -1.0);
            assert_eq!(result.truncated, t == 4);
        }
    }

    #[test]
    fn fresh_environments_replay_same_episodes() {
        let mut a = MountainCar::new(9);
        let mut b = MountainCar::new(9);
        assert_eq!(a.reset(), b.reset());
        assert_eq!(a.reset(), b.reset());
    }

    #[test]
    fn max_seed_wraps_on_reset() {
        let mut env = MountainCar::new(u64::MAX);
        let first = env.reset();
        let second = env.reset();
        assert_eq!(second, MountainCar::new(0).reset());
        assert!((-0.6..-0.4).contains(&first[0]));
    }

    #[test]
    fn energy_pumping_reaches_goal() {
        let mut env = MountainCar::new(0);
        env.reset();
        let mut reached = false;
        for _ in 0..DEFAULT_MAX_STEPS {
            let action = if env.velocity() >= 0.0 { 2 } else { 0 };
            let result = env.step(action);
            if result.terminated {
                reached = true;
                break;
            }
        }
        assert!(reached);
    }

    #[test]
    #[should_panic(expected = "action")]
    fn invalid_action_panics() {
        let mut env = MountainCar::new(0);
        env.reset();
        env.step(3);
    }
}
