//! Trajectory storage and advantage estimation for policy-gradient learners.

pub mod buffer;
pub mod gae;

pub use buffer::{BufferError, TrajectoryBatch, TrajectoryBuffer};
pub use gae::{compute_gae, discount_cumsum};
