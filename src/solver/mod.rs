//! # Solver
//!
//! The evolutionary loop: setup, initialization, one mutate-and-replace cycle per
//! epoch, teardown and a final sort that puts the best candidate at rank 0.

pub mod builder;
pub mod engine;
pub mod options;

pub use builder::SolverBuilder;
pub use engine::Solver;
pub use options::{CloneCount, DecayCurve, Epochs, SolverOptions, SolverOptionsBuilder};
