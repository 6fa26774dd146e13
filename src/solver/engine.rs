use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, instrument, trace};

use super::builder::SolverBuilder;
use super::options::{Epochs, SolverOptions};
use crate::{
    candidate::Candidate,
    error::{EvolutionError, OptionExt, Result},
    population::Population,
    problem::Problem,
    rng::{ClockSeeds, SeedSequence},
};

/// Evolves a population of candidates against a problem.
///
/// Each generation every candidate is hill climbed: it spawns a batch of mutated
/// clones and is replaced by the best of them when that clone is at least as fit.
/// Afterwards the weakest fraction of the population is dropped and replaced by
/// fresh random candidates.
///
/// # Concurrency
///
/// Every phase (generation, evaluation, hill climbing, replacement) fans out one
/// rayon task per candidate and joins before the next phase starts. Hill climbing
/// nests a second fan-out per candidate, so a generation creates
/// `population_size * clone_count` trial tasks, quadratic in the population size
/// with the default clone count. Those tasks are executed by a fixed-size pool: the
/// global rayon pool, or a dedicated one when
/// [`SolverOptions::num_threads`] is set, which bounds peak parallelism.
///
/// Each task owns the candidates and streams it touches. Seeds for new streams are
/// drawn on the calling thread before a phase fans out, so a deterministic
/// [`SeedSequence`] reproduces a run exactly.
///
/// A panic inside the problem's fitness function is not caught; it propagates out of
/// [`Solver::run`].
pub struct Solver<P: Problem> {
    options: SolverOptions,
    generation: usize,
    population: Population<P::Candidate>,
    /// The population was supplied by the caller and is consumed by the next initialize
    seeded: bool,
    problem: Option<Arc<P>>,
    seeds: Box<dyn SeedSequence>,
}

impl<P: Problem> Solver<P> {
    pub fn new() -> Self {
        Self::with_options(SolverOptions::default())
    }

    pub fn with_options(options: SolverOptions) -> Self {
        Self {
            options,
            generation: 0,
            population: Population::new(),
            seeded: false,
            problem: None,
            seeds: Box::new(ClockSeeds::default()),
        }
    }

    pub fn builder() -> SolverBuilder<P> {
        SolverBuilder::new()
    }

    pub fn set_problem(&mut self, problem: P) {
        self.problem = Some(Arc::new(problem));
    }

    /// Sets a problem that is also held elsewhere, e.g. by other solvers.
    pub fn set_shared_problem(&mut self, problem: Arc<P>) {
        self.problem = Some(problem);
    }

    /// Sets the epoch budget; `-1` means unbounded.
    pub fn set_epochs(&mut self, epochs: impl Into<Epochs>) {
        self.options.set_epochs(epochs);
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.options.set_population_size(population_size);
    }

    /// Seeds the starting population of the next run.
    ///
    /// The candidates are evaluated during initialization, topped up with fresh ones
    /// when there are fewer than the population size, and cut down to the best ones
    /// when there are more.
    pub fn set_population(&mut self, population: Vec<P::Candidate>) {
        self.population = Population::from(population);
        self.seeded = true;
    }

    pub fn set_options(&mut self, options: SolverOptions) {
        self.options = options;
    }

    /// Replaces the policy that seeds the streams of new candidates and trials.
    pub fn set_seed_sequence(&mut self, seeds: impl SeedSequence + 'static) {
        self.seeds = Box::new(seeds);
    }

    pub(crate) fn set_boxed_seed_sequence(&mut self, seeds: Box<dyn SeedSequence>) {
        self.seeds = seeds;
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// The current generation, starting at 1 after setup.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[P::Candidate] {
        self.population.as_slice()
    }

    pub fn problem(&self) -> Option<&P> {
        self.problem.as_deref()
    }

    fn require_problem(&self) -> Result<Arc<P>> {
        self.problem.clone().ok_or_else_evolution(|| {
            EvolutionError::PreconditionViolation("Problem not specified".to_string())
        })
    }

    /// Runs the full evolutionary process and returns the best candidate found.
    ///
    /// # Errors
    ///
    /// - [`EvolutionError::PreconditionViolation`] if no problem is set or the
    ///   population size is zero.
    /// - [`EvolutionError::InvalidArgument`] if the options fail validation.
    /// - [`EvolutionError::ThreadPool`] if the dedicated worker pool cannot be built.
    pub fn run(&mut self) -> Result<P::Candidate> {
        let problem = self.require_problem()?;
        if self.options.population_size() == 0 {
            return Err(EvolutionError::PreconditionViolation(
                "Population size cannot be zero".to_string(),
            ));
        }
        self.options.validate()?;

        match self.options.num_threads() {
            Some(threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| EvolutionError::ThreadPool(e.to_string()))?;
                pool.install(|| self.run_phases(&problem))
            }
            None => self.run_phases(&problem),
        }
    }

    #[instrument(name = "solve", skip_all, fields(problem = problem.name()))]
    fn run_phases(&mut self, problem: &P) -> Result<P::Candidate> {
        info!(
            population_size = self.options.population_size(),
            epochs = ?self.options.epochs(),
            objective = %problem.objective(),
            "starting evolution"
        );

        self.setup();
        self.initialize()?;

        while self.options.epochs().allows(self.generation) {
            self.generation += 1;
            self.evolve()?;
            debug!(
                generation = self.generation,
                best = ?self.population.best().and_then(|c| c.fitness()),
                "generation complete"
            );
        }

        self.teardown();
        self.sort_population()?;

        let best = self
            .population
            .best()
            .cloned()
            .ok_or_else_evolution(|| EvolutionError::EmptyPopulation)?;

        info!(
            generation = self.generation,
            fitness = ?best.fitness(),
            "evolution finished"
        );
        Ok(best)
    }

    /// Resets the generation counter to 1.
    pub fn setup(&mut self) {
        self.generation = 1;
    }

    /// Builds, evaluates and sorts the starting population.
    pub fn initialize(&mut self) -> Result<()> {
        let problem = self.require_problem()?;
        let size = self.options.population_size();

        let mut members = if std::mem::take(&mut self.seeded) {
            std::mem::take(&mut self.population).into_vec()
        } else {
            Vec::with_capacity(size)
        };

        let missing = size.saturating_sub(members.len());
        let seeds = self.draw_seeds(missing);
        members.extend(Self::spawn(&problem, seeds));
        Self::evaluate_all(&problem, &mut members);

        let mut population = Population::from(members);
        population.sort(problem.objective());
        population.truncate_worst(population.len().saturating_sub(size));
        self.population = population;

        debug!(size = self.population.len(), "population initialized");
        Ok(())
    }

    /// One generation: hill climb every candidate, then replace the weakest.
    pub fn evolve(&mut self) -> Result<()> {
        self.mutate()?;
        self.replace()
    }

    /// Hill climbs every candidate of the sorted population in parallel.
    ///
    /// The candidate at rank `i` spawns the configured number of clones, each
    /// mutated with the probability for rank `i`. The best clone takes the slot when
    /// its fitness is at least as good as the original's (ties favour the clone).
    /// Slots are never reordered.
    pub fn mutate(&mut self) -> Result<()> {
        let problem = self.require_problem()?;
        let size = self.population.len();
        let trials = self.options.trials_per_candidate();
        let seeds: Vec<Vec<i64>> = (0..size).map(|_| self.draw_seeds(trials)).collect();

        let options = &self.options;
        self.population
            .as_mut_slice()
            .par_iter_mut()
            .zip(seeds)
            .enumerate()
            .for_each(|(rank, (candidate, seeds))| {
                let probability = options.mutation_probability(rank, size);
                if let Some(winner) = Self::climb(&problem, candidate, probability, seeds) {
                    trace!(
                        rank,
                        from = ?candidate.fitness(),
                        to = ?winner.fitness(),
                        "trial accepted"
                    );
                    *candidate = winner;
                }
            });

        Ok(())
    }

    fn climb(
        problem: &P,
        incumbent: &P::Candidate,
        probability: f64,
        seeds: Vec<i64>,
    ) -> Option<P::Candidate> {
        let mut trials: Vec<P::Candidate> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut trial = incumbent.clone_with_stream(problem.spawn_stream(seed));
                trial.mutate(probability);
                trial
            })
            .collect();
        Self::evaluate_all(problem, &mut trials);

        let objective = problem.objective();
        let mut trials = Population::from(trials);
        trials.sort(objective);
        let best = trials.into_vec().into_iter().next()?;

        objective
            .admits(best.fitness(), incumbent.fitness())
            .then_some(best)
    }

    /// Drops the weakest `floor(replacement_rate * population_size)` candidates and
    /// immigrates as many fresh, evaluated ones.
    pub fn replace(&mut self) -> Result<()> {
        let problem = self.require_problem()?;
        let objective = problem.objective();
        let count = self.options.replace_count();

        self.population.truncate_worst(count);

        let seeds = self.draw_seeds(count);
        let mut immigrants = Self::spawn(&problem, seeds);
        Self::evaluate_all(&problem, &mut immigrants);
        let mut immigrants = Population::from(immigrants);
        immigrants.sort(objective);

        self.population.extend(immigrants.into_vec());
        self.population.sort(objective);

        debug!(replaced = count, "immigrants added");
        Ok(())
    }

    /// Counterpart of [`Solver::setup`]; nothing to release.
    pub fn teardown(&mut self) {
        debug!(generation = self.generation, "teardown");
    }

    /// Sorts the population so the best candidate for the objective is first.
    pub fn sort_population(&mut self) -> Result<()> {
        let problem = self.require_problem()?;
        self.population.sort(problem.objective());
        Ok(())
    }

    /// Generates `count` fresh, unevaluated candidates in parallel.
    pub fn generate_candidates(&mut self, count: usize) -> Result<Vec<P::Candidate>> {
        let problem = self.require_problem()?;
        let seeds = self.draw_seeds(count);
        Ok(Self::spawn(&problem, seeds))
    }

    /// Evaluates `candidates` in parallel.
    pub fn evaluate_candidates(&self, candidates: &mut [P::Candidate]) -> Result<()> {
        let problem = self.require_problem()?;
        Self::evaluate_all(&problem, candidates);
        Ok(())
    }

    fn draw_seeds(&mut self, count: usize) -> Vec<i64> {
        (0..count).map(|_| self.seeds.next_seed()).collect()
    }

    fn spawn(problem: &P, seeds: Vec<i64>) -> Vec<P::Candidate> {
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut candidate = problem.new_candidate(problem.spawn_stream(seed));
                candidate.generate();
                candidate
            })
            .collect()
    }

    fn evaluate_all(problem: &P, candidates: &mut [P::Candidate]) {
        candidates
            .par_iter_mut()
            .for_each(|candidate| problem.evaluate(candidate));
    }
}

impl<P: Problem> Default for Solver<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateCore;
    use crate::objective::Objective;
    use crate::problem::ProblemDescriptor;
    use crate::problems::onemax::OneMax;
    use crate::rng::{RandomGenerator, RandomStream, SplitMixSeeds, WeylGenerator};
    use crate::solver::options::CloneCount;
    use std::collections::HashSet;

    fn onemax_solver(dimensions: usize, population_size: usize) -> Solver<OneMax> {
        let mut solver = Solver::new();
        solver.set_problem(OneMax::new(dimensions, Box::new(RandomGenerator::new(1))));
        solver.set_population_size(population_size);
        solver.set_seed_sequence(SplitMixSeeds::new(17));
        solver
    }

    /// A scalar candidate whose fitness never changes, used to observe tie handling.
    #[derive(Debug, Clone)]
    struct Flat {
        core: CandidateCore,
    }

    impl Candidate for Flat {
        type Phenotype = ();

        fn core(&self) -> &CandidateCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut CandidateCore {
            &mut self.core
        }

        fn generate(&mut self) {}

        fn mutate(&mut self, _probability: f64) {}

        fn clone_with_stream(&self, stream: Box<dyn RandomStream>) -> Self {
            Self {
                core: CandidateCore::new(self.dimensions(), stream),
            }
        }

        fn phenotype(&self) -> &() {
            &()
        }
    }

    struct FlatProblem {
        descriptor: ProblemDescriptor,
    }

    impl Problem for FlatProblem {
        type Candidate = Flat;

        fn descriptor(&self) -> &ProblemDescriptor {
            &self.descriptor
        }

        fn new_candidate(&self, stream: Box<dyn RandomStream>) -> Flat {
            Flat {
                core: CandidateCore::new(self.dimensions(), stream),
            }
        }

        fn score(&self, _candidate: &Flat) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_run_without_problem_fails() {
        let mut solver: Solver<OneMax> = Solver::new();
        assert!(matches!(
            solver.run(),
            Err(EvolutionError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_run_with_zero_population_fails() {
        let mut solver = onemax_solver(8, 0);
        match solver.run() {
            Err(EvolutionError::PreconditionViolation(msg)) => {
                assert!(msg.contains("Population size cannot be zero"))
            }
            other => panic!(
                "Expected PreconditionViolation, got {:?}",
                other.map(|c| c.fitness())
            ),
        }
    }

    #[test]
    fn test_phases_without_problem_fail() {
        let mut solver: Solver<OneMax> = Solver::new();
        assert!(solver.initialize().is_err());
        assert!(solver.mutate().is_err());
        assert!(solver.replace().is_err());
        assert!(solver.sort_population().is_err());
    }

    #[test]
    fn test_initialize_builds_sorted_evaluated_population() {
        let mut solver = onemax_solver(16, 12);
        solver.setup();
        solver.initialize().unwrap();

        assert_eq!(solver.generation(), 1);
        assert_eq!(solver.population().len(), 12);
        assert!(solver.population().iter().all(|c| c.fitness().is_some()));
        assert!(Population::from(solver.population().to_vec()).is_sorted_by(Objective::Maximize));
    }

    #[test]
    fn test_mutate_never_worsens_a_slot() {
        let mut solver = onemax_solver(32, 10);
        solver.setup();
        solver.initialize().unwrap();

        for _ in 0..3 {
            let before: Vec<f64> = solver.population().iter().filter_map(|c| c.fitness()).collect();
            solver.mutate().unwrap();
            let after: Vec<f64> = solver.population().iter().filter_map(|c| c.fitness()).collect();

            assert_eq!(before.len(), after.len());
            for (old, new) in before.iter().zip(&after) {
                assert!(new >= old, "fitness dropped from {} to {}", old, new);
            }
            solver.sort_population().unwrap();
        }
    }

    #[test]
    fn test_mutate_ties_favour_the_clone() {
        let mut solver = Solver::new();
        solver.set_problem(FlatProblem {
            descriptor: ProblemDescriptor::new(
                "flat",
                1,
                Objective::Minimize,
                Box::new(WeylGenerator::new(3)),
            ),
        });
        solver.set_options(
            SolverOptions::builder()
                .population_size(5)
                .clone_count(CloneCount::Fixed(2))
                .build(),
        );
        solver.setup();
        solver.initialize().unwrap();

        let before: Vec<_> = solver.population().iter().map(|c| c.id()).collect();
        solver.mutate().unwrap();
        for (old, candidate) in before.iter().zip(solver.population()) {
            assert_ne!(*old, candidate.id());
            assert_eq!(candidate.fitness(), Some(1.0));
        }
    }

    #[test]
    fn test_replace_immigrates_exactly_ten_percent() {
        let mut solver = onemax_solver(8, 10);
        solver.setup();
        solver.initialize().unwrap();

        let before: HashSet<_> = solver.population().iter().map(|c| c.id()).collect();
        solver.replace().unwrap();

        assert_eq!(solver.population().len(), 10);
        let newcomers = solver
            .population()
            .iter()
            .filter(|c| !before.contains(&c.id()))
            .count();
        assert_eq!(newcomers, 1);
        assert!(solver.population().iter().all(|c| c.fitness().is_some()));
    }

    #[test]
    fn test_set_population_is_consumed_by_initialize() {
        let mut solver = onemax_solver(8, 6);
        let seeded = solver.generate_candidates(3).unwrap();
        let ids: HashSet<_> = seeded.iter().map(|c| c.id()).collect();

        solver.set_population(seeded);
        solver.setup();
        solver.initialize().unwrap();

        assert_eq!(solver.population().len(), 6);
        let kept = solver.population().iter().filter(|c| ids.contains(&c.id())).count();
        assert_eq!(kept, 3);

        solver.initialize().unwrap();
        let kept = solver.population().iter().filter(|c| ids.contains(&c.id())).count();
        assert_eq!(kept, 0);
    }

    #[test]
    fn test_oversized_seed_population_keeps_the_best() {
        let mut solver = onemax_solver(8, 4);
        let mut seeded = solver.generate_candidates(9).unwrap();
        solver.evaluate_candidates(&mut seeded).unwrap();
        let mut best: Vec<f64> = seeded.iter().filter_map(|c| c.fitness()).collect();
        best.sort_by(|a, b| b.partial_cmp(a).unwrap());

        solver.set_population(seeded);
        solver.initialize().unwrap();

        let kept: Vec<f64> = solver.population().iter().filter_map(|c| c.fitness()).collect();
        assert_eq!(kept, best[..4].to_vec());
    }

    #[test]
    fn test_dedicated_pool() {
        let mut solver = onemax_solver(8, 10);
        solver.set_options(
            SolverOptions::builder()
                .epochs(3usize)
                .population_size(10)
                .num_threads(2)
                .build(),
        );
        let best = solver.run().unwrap();
        assert!(best.fitness().unwrap() <= 8.0);
        assert_eq!(solver.generation(), 3);
    }
}
