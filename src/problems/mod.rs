//! Reference problems built on the [`Problem`](crate::problem::Problem) and
//! [`Candidate`](crate::candidate::Candidate) traits.

pub mod onemax;

pub use onemax::{OneMax, OneMaxCandidate};
