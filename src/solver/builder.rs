use std::sync::Arc;

use super::options::{Epochs, SolverOptions};
use super::Solver;
use crate::{
    error::{EvolutionError, Result},
    problem::Problem,
    rng::SeedSequence,
};

/// Fluent construction of a [`Solver`].
///
/// ```rust
/// use evosolve::problems::onemax::OneMax;
/// use evosolve::rng::{SplitMixSeeds, WeylGenerator};
/// use evosolve::solver::Solver;
///
/// let mut solver = Solver::builder()
///     .with_problem(OneMax::new(8, Box::new(WeylGenerator::new(1))))
///     .with_population_size(10)
///     .with_epochs(2)
///     .with_seed_sequence(SplitMixSeeds::new(3))
///     .build()
///     .unwrap();
///
/// let best = solver.run().unwrap();
/// assert_eq!(solver.generation(), 2);
/// # let _ = best;
/// ```
pub struct SolverBuilder<P: Problem> {
    problem: Option<Arc<P>>,
    options: SolverOptions,
    seeds: Option<Box<dyn SeedSequence>>,
    population: Option<Vec<P::Candidate>>,
}

impl<P: Problem> SolverBuilder<P> {
    pub fn new() -> Self {
        Self {
            problem: None,
            options: SolverOptions::default(),
            seeds: None,
            population: None,
        }
    }

    pub fn with_problem(mut self, problem: P) -> Self {
        self.problem = Some(Arc::new(problem));
        self
    }

    pub fn with_shared_problem(mut self, problem: Arc<P>) -> Self {
        self.problem = Some(problem);
        self
    }

    /// Replaces every option set so far.
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_epochs(mut self, epochs: impl Into<Epochs>) -> Self {
        self.options.set_epochs(epochs);
        self
    }

    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.options.set_population_size(population_size);
        self
    }

    pub fn with_seed_sequence(mut self, seeds: impl SeedSequence + 'static) -> Self {
        self.seeds = Some(Box::new(seeds));
        self
    }

    pub fn with_population(mut self, population: Vec<P::Candidate>) -> Self {
        self.population = Some(population);
        self
    }

    pub fn build(self) -> Result<Solver<P>> {
        let problem = self.problem.ok_or_else(|| {
            EvolutionError::PreconditionViolation("Problem not specified".to_string())
        })?;
        self.options.validate()?;

        let mut solver = Solver::with_options(self.options);
        solver.set_shared_problem(problem);
        if let Some(seeds) = self.seeds {
            solver.set_boxed_seed_sequence(seeds);
        }
        if let Some(population) = self.population {
            solver.set_population(population);
        }
        Ok(solver)
    }
}

impl<P: Problem> Default for SolverBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
