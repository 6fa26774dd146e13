pub mod candidate;
pub mod error;
pub mod objective;
pub mod population;
pub mod problem;
pub mod problems;
pub mod rng;
pub mod solver;

// Re-export commonly used types for convenience
pub use candidate::{Candidate, CandidateCore, CandidateId};
pub use error::{EvolutionError, OptionExt, Result};
pub use objective::Objective;
pub use population::Population;
pub use problem::{Problem, ProblemDescriptor};
pub use rng::{RandomGenerator, RandomStream, RandomStreamExt, WeylGenerator};
pub use solver::{Solver, SolverOptions};
