//! tilerl - tile-coded features for reinforcement learning
//!
//! A randomized multi-tiling tile coder that turns bounded continuous
//! observations into sparse binary features, together with the pieces that
//! consume it: an observation wrapper for environments, linear agents,
//! a GAE trajectory buffer, and a small experiment loop.

pub mod agents;
pub mod config;
pub mod environment;
pub mod experiment;
pub mod tile_coding;
pub mod training;

pub use config::{LinearAgentConfig, TargetKind, TileCodingConfig};
pub use tile_coding::{TileCoder, TileCodingError};
