//! # OneMax
//!
//! The classic benchmark: a binary string whose fitness is its number of ones.
//!
//! ## Example
//!
//! ```rust
//! use evosolve::problems::onemax::OneMax;
//! use evosolve::rng::RandomGenerator;
//! use evosolve::solver::Solver;
//! use evosolve::Candidate;
//!
//! let mut solver = Solver::new();
//! solver.set_problem(OneMax::new(16, Box::new(RandomGenerator::new(7))));
//! solver.set_population_size(20);
//! solver.set_epochs(5);
//!
//! let best = solver.run().unwrap();
//! assert!(best.fitness().unwrap() <= 16.0);
//! ```

use crate::candidate::{Candidate, CandidateCore};
use crate::objective::Objective;
use crate::problem::{Problem, ProblemDescriptor};
use crate::rng::RandomStream;

/// A fixed-length string of zeros and ones.
#[derive(Debug, Clone)]
pub struct OneMaxCandidate {
    core: CandidateCore,
    genes: Vec<u8>,
}

impl OneMaxCandidate {
    pub fn new(dimensions: usize, stream: Box<dyn RandomStream>) -> Self {
        Self {
            core: CandidateCore::new(dimensions, stream),
            genes: Vec::new(),
        }
    }

    fn random_gene(stream: &mut dyn RandomStream) -> u8 {
        u8::from(stream.uniform_float() > 0.5)
    }
}

impl Candidate for OneMaxCandidate {
    type Phenotype = [u8];

    fn core(&self) -> &CandidateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CandidateCore {
        &mut self.core
    }

    fn generate(&mut self) {
        let dimensions = self.core.dimensions();
        let stream = self.core.stream();
        self.genes = (0..dimensions).map(|_| Self::random_gene(stream)).collect();
        self.core.invalidate();
    }

    fn mutate(&mut self, probability: f64) {
        let stream = self.core.stream();
        for gene in self.genes.iter_mut() {
            if stream.uniform_float() < probability {
                *gene = Self::random_gene(stream);
            }
        }
        self.core.invalidate();
    }

    fn clone_with_stream(&self, stream: Box<dyn RandomStream>) -> Self {
        Self {
            core: CandidateCore::new(self.core.dimensions(), stream),
            genes: self.genes.clone(),
        }
    }

    fn phenotype(&self) -> &[u8] {
        &self.genes
    }
}

/// Maximise the number of ones in a binary string.
#[derive(Debug, Clone)]
pub struct OneMax {
    descriptor: ProblemDescriptor,
}

impl OneMax {
    pub fn new(dimensions: usize, stream: Box<dyn RandomStream>) -> Self {
        Self {
            descriptor: ProblemDescriptor::new("One Max", dimensions, Objective::Maximize, stream),
        }
    }
}

impl Problem for OneMax {
    type Candidate = OneMaxCandidate;

    fn descriptor(&self) -> &ProblemDescriptor {
        &self.descriptor
    }

    fn new_candidate(&self, stream: Box<dyn RandomStream>) -> OneMaxCandidate {
        OneMaxCandidate::new(self.dimensions(), stream)
    }

    fn score(&self, candidate: &OneMaxCandidate) -> f64 {
        candidate.genes.iter().map(|&gene| f64::from(gene)).sum()
    }
}
