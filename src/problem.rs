//! # Problem Trait
//!
//! A `Problem` supplies what the solver cannot know on its own: how many dimensions a
//! candidate has, whether fitness is maximised or minimised, how to build a fresh
//! candidate and how to score one.
//!
//! Shared configuration (name, dimensions, objective and the prototype random stream)
//! is held in a [`ProblemDescriptor`] which implementations expose through
//! [`Problem::descriptor`].

use std::fmt::Debug;

use crate::candidate::Candidate;
use crate::objective::Objective;
use crate::rng::RandomStream;

/// Configuration shared by every problem implementation.
///
/// The stream is only a prototype: new candidates receive streams reseeded from it,
/// never the stream itself.
#[derive(Debug, Clone)]
pub struct ProblemDescriptor {
    name: String,
    dimensions: usize,
    objective: Objective,
    stream: Box<dyn RandomStream>,
}

impl ProblemDescriptor {
    pub fn new(
        name: impl Into<String>,
        dimensions: usize,
        objective: Objective,
        stream: Box<dyn RandomStream>,
    ) -> Self {
        Self {
            name: name.into(),
            dimensions,
            objective,
            stream,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn stream(&self) -> &dyn RandomStream {
        self.stream.as_ref()
    }
}

/// A search space, an objective direction and a fitness function.
///
/// `score` and `evaluate` are called concurrently on distinct candidates, so they must
/// not rely on interior mutability without synchronisation.
pub trait Problem: Send + Sync {
    type Candidate: Candidate;

    fn descriptor(&self) -> &ProblemDescriptor;

    /// Builds an unevaluated, ungenerated candidate that owns `stream`.
    fn new_candidate(&self, stream: Box<dyn RandomStream>) -> Self::Candidate;

    /// Computes the fitness of `candidate`.
    fn score(&self, candidate: &Self::Candidate) -> f64;

    /// Scores `candidate` and stores the result in its fitness field.
    fn evaluate(&self, candidate: &mut Self::Candidate) {
        let fitness = self.score(candidate);
        candidate.set_fitness(fitness);
    }

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn dimensions(&self) -> usize {
        self.descriptor().dimensions()
    }

    fn objective(&self) -> Objective {
        self.descriptor().objective()
    }

    fn stream(&self) -> &dyn RandomStream {
        self.descriptor().stream()
    }

    /// A stream of the prototype's family seeded with `seed`.
    fn spawn_stream(&self, seed: i64) -> Box<dyn RandomStream> {
        self.stream().reseeded(seed)
    }
}
