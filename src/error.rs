//! # Error Types
//!
//! This module defines the error type shared by the solver, the random streams and
//! the configuration layer.
//!
//! Most malformed inputs are clamped to a documented fallback instead of failing
//! (sampling with a non-positive size returns nothing, sampling more items than exist
//! returns all of them). An error is only surfaced where no safe fallback exists.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evosolve::error::{EvolutionError, Result};
//!
//! fn checked_size(size: usize) -> Result<usize> {
//!     if size == 0 {
//!         return Err(EvolutionError::InvalidArgument("size must be positive".to_string()));
//!     }
//!     Ok(size)
//! }
//!
//! assert!(checked_size(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use evosolve::error::{EvolutionError, OptionExt};
//!
//! fn best_score(scores: &[i32]) -> evosolve::error::Result<i32> {
//!     scores.iter().max().cloned().ok_or_else_evolution(|| EvolutionError::EmptyPopulation)
//! }
//!
//! assert_eq!(best_score(&[1, 3, 2]).unwrap(), 3);
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running a solver.
#[derive(Error, Debug)]
pub enum EvolutionError {
    /// An argument was malformed and no fallback behaviour applies.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked on a solver that is not ready for it.
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// The bounded worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// A specialized Result type for solver operations.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T>` using `err_fn` to build the error.
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError,
    {
        self.ok_or_else(err_fn)
    }
}
