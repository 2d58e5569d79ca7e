// Demonstration: linear Expected Sarsa on tile-coded mountain car.
//
// Run from the repo root:
//   RUST_LOG=info cargo run --example mountain_car_sarsa -- --agent sarsa --episodes 200

use std::env;

use tilerl::agents::{Agent, LinearAgent, RandomAgent};
use tilerl::environment::{Encoding, Environment, MountainCar, TileCodedEnv};
use tilerl::experiment::{EvaluationSummary, Experiment};
use tilerl::{LinearAgentConfig, TargetKind};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let agent_name = arg_value(&args, "--agent").unwrap_or("sarsa");
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut env = match TileCodedEnv::new(
        MountainCar::with_max_steps(seed, 1_000),
        vec![vec![8, 8]; 8],
        seed,
        false,
        Encoding::Indices,
    ) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Failed to wrap environment: {}", e);
            std::process::exit(1);
        }
    };

    let base = LinearAgentConfig {
        epsilon: 0.0,
        seed,
        ..LinearAgentConfig::default()
    };
    let mut agent: Box<dyn Agent> = match agent_name {
        "sarsa" => Box::new(LinearAgent::for_env(&env, base)),
        "q" => Box::new(LinearAgent::for_env(
            &env,
            LinearAgentConfig {
                target: TargetKind::QLearning,
                ..base
            },
        )),
        "random" => Box::new(RandomAgent::new(env.action_count(), seed)),
        other => {
            eprintln!("Unknown --agent '{}'; expected 'sarsa', 'q' or 'random'.", other);
            std::process::exit(2);
        }
    };

    let experiment = Experiment {
        max_steps_per_episode: 1_000,
        log_every: 20,
    };
    let history = experiment.run(&mut env, agent.as_mut(), episodes);

    let tail = &history[history.len().saturating_sub(20)..];
    println!("Agent: {}", agent.name());
    match EvaluationSummary::from_episodes(tail) {
        Some(summary) => println!("{}", summary),
        None => println!("No episodes run."),
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
