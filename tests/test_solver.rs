use evosolve::{
    candidate::{Candidate, CandidateCore},
    error::EvolutionError,
    objective::Objective,
    problem::{Problem, ProblemDescriptor},
    problems::onemax::OneMax,
    rng::{RandomGenerator, RandomStream, SplitMixSeeds, WeylGenerator},
    solver::{CloneCount, DecayCurve, Solver, SolverOptions},
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug)]
struct Point {
    core: CandidateCore,
    coords: Vec<f64>,
}

impl Candidate for Point {
    type Phenotype = [f64];

    fn core(&self) -> &CandidateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CandidateCore {
        &mut self.core
    }

    fn generate(&mut self) {
        let dimensions = self.core.dimensions();
        let stream = self.core.stream();
        self.coords = (0..dimensions)
            .map(|_| stream.ranged_float(-5.0, 5.0))
            .collect();
    }

    fn mutate(&mut self, probability: f64) {
        let stream = self.core.stream();
        for coord in self.coords.iter_mut() {
            if stream.uniform_float() < probability {
                *coord += stream.normal_float() * 0.5;
            }
        }
        self.core.invalidate();
    }

    fn clone_with_stream(&self, stream: Box<dyn RandomStream>) -> Self {
        Self {
            core: CandidateCore::new(self.core.dimensions(), stream),
            coords: self.coords.clone(),
        }
    }

    fn phenotype(&self) -> &[f64] {
        &self.coords
    }
}

/// Minimise the squared distance to the origin.
struct Sphere {
    descriptor: ProblemDescriptor,
}

impl Sphere {
    fn new(dimensions: usize) -> Self {
        Self {
            descriptor: ProblemDescriptor::new(
                "Sphere",
                dimensions,
                Objective::Minimize,
                Box::new(WeylGenerator::new(11)),
            ),
        }
    }
}

impl Problem for Sphere {
    type Candidate = Point;

    fn descriptor(&self) -> &ProblemDescriptor {
        &self.descriptor
    }

    fn new_candidate(&self, stream: Box<dyn RandomStream>) -> Point {
        Point {
            core: CandidateCore::new(self.dimensions(), stream),
            coords: Vec::new(),
        }
    }

    fn score(&self, candidate: &Point) -> f64 {
        candidate.coords.iter().map(|x| x * x).sum()
    }
}

fn onemax_solver(dimensions: usize, population_size: usize, epochs: i64) -> Solver<OneMax> {
    let mut solver = Solver::new();
    solver.set_problem(OneMax::new(dimensions, Box::new(RandomGenerator::new(5))));
    solver.set_population_size(population_size);
    solver.set_epochs(epochs);
    solver
}

#[test]
fn test_solver_evolution() {
    init_tracing();
    let mut solver = onemax_solver(8, 10, 2);

    let best = solver.run().unwrap();

    let fitness = best.fitness().unwrap();
    assert!((0.0..=8.0).contains(&fitness));
    assert_eq!(solver.generation(), 2);
    assert_eq!(solver.population().len(), 10);
    assert_eq!(best.phenotype().len(), 8);
}

#[test]
fn test_final_population_is_sorted_and_best_is_first() {
    let mut solver = onemax_solver(24, 20, 4);
    let best = solver.run().unwrap();

    let fitness: Vec<f64> = solver.population().iter().filter_map(|c| c.fitness()).collect();
    assert_eq!(fitness.len(), 20);
    for pair in fitness.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    assert_eq!(best.id(), solver.population()[0].id());
    assert_eq!(best.fitness(), Some(fitness[0]));
}

fn snapshot(solver: &Solver<OneMax>) -> Vec<(Option<f64>, Vec<u8>)> {
    solver
        .population()
        .iter()
        .map(|c| (c.fitness(), c.phenotype().to_vec()))
        .collect()
}

#[test]
fn test_zero_epochs_returns_best_of_initial_population() {
    // same seeds, so `mirror` initializes exactly what each run starts from
    let mut mirror = onemax_solver(16, 12, 0);
    mirror.set_seed_sequence(SplitMixSeeds::new(21));
    let mut solver = onemax_solver(16, 12, 0);
    solver.set_seed_sequence(SplitMixSeeds::new(21));

    for _ in 0..2 {
        mirror.setup();
        mirror.initialize().unwrap();
        let initial = snapshot(&mirror);

        let best = solver.run().unwrap();

        assert_eq!(solver.generation(), 1);
        assert_eq!(snapshot(&solver), initial);
        assert_eq!(best.fitness(), initial[0].0);
        assert_eq!(best.phenotype(), initial[0].1.as_slice());
    }
}

#[test]
fn test_epochs_never_lose_the_initial_best() {
    let best_after = |epochs: i64| {
        let mut solver = onemax_solver(32, 30, epochs);
        solver.set_seed_sequence(SplitMixSeeds::new(99));
        solver.run().unwrap().fitness().unwrap()
    };

    // same seeds, same initial population
    assert!(best_after(25) >= best_after(0));
}

#[test]
fn test_minimisation_with_linear_decay() {
    init_tracing();
    let best_after = |epochs: usize| {
        let options = SolverOptions::builder()
            .epochs(epochs)
            .population_size(20)
            .clone_count(CloneCount::Fixed(10))
            .decay(DecayCurve::Linear)
            .build();
        let mut solver = Solver::with_options(options);
        solver.set_problem(Sphere::new(3));
        solver.set_seed_sequence(SplitMixSeeds::new(7));

        let best = solver.run().unwrap();
        let fitness: Vec<f64> = solver.population().iter().filter_map(|c| c.fitness()).collect();
        for pair in fitness.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        best.fitness().unwrap()
    };

    let initial = best_after(0);
    let evolved = best_after(30);
    assert!(evolved < initial, "{evolved} !< {initial}");
}

#[test]
fn test_minimisation_mutate_never_raises_a_slot() {
    let mut solver = Solver::with_options(
        SolverOptions::builder()
            .population_size(15)
            .clone_count(CloneCount::Fixed(6))
            .decay(DecayCurve::Linear)
            .build(),
    );
    solver.set_problem(Sphere::new(4));
    solver.set_seed_sequence(SplitMixSeeds::new(3));
    solver.setup();
    solver.initialize().unwrap();

    for _ in 0..5 {
        let before: Vec<f64> = solver.population().iter().filter_map(|c| c.fitness()).collect();
        solver.mutate().unwrap();
        let after: Vec<f64> = solver.population().iter().filter_map(|c| c.fitness()).collect();

        assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(&after) {
            assert!(new <= old, "fitness rose from {} to {}", old, new);
        }
        solver.replace().unwrap();
    }
}

#[test]
fn test_deterministic_seeds_reproduce_a_run() {
    let run = |seed: i64| {
        let mut solver = onemax_solver(20, 10, 5);
        solver.set_seed_sequence(SplitMixSeeds::new(seed));
        let best = solver.run().unwrap();
        (best.fitness(), best.phenotype().to_vec())
    };

    assert_eq!(run(1234), run(1234));
}

#[test]
fn test_zero_population_is_a_precondition_violation() {
    let mut solver = onemax_solver(8, 0, 2);
    assert!(matches!(
        solver.run(),
        Err(EvolutionError::PreconditionViolation(_))
    ));
}

#[test]
fn test_invalid_options_are_rejected_by_run() {
    let mut solver = onemax_solver(8, 10, 2);
    solver.set_options(
        SolverOptions::builder()
            .population_size(10)
            .replacement_rate(2.0)
            .build(),
    );
    assert!(matches!(
        solver.run(),
        Err(EvolutionError::InvalidArgument(_))
    ));
}

struct Exploding {
    descriptor: ProblemDescriptor,
}

impl Problem for Exploding {
    type Candidate = Point;

    fn descriptor(&self) -> &ProblemDescriptor {
        &self.descriptor
    }

    fn new_candidate(&self, stream: Box<dyn RandomStream>) -> Point {
        Point {
            core: CandidateCore::new(self.dimensions(), stream),
            coords: Vec::new(),
        }
    }

    fn score(&self, _candidate: &Point) -> f64 {
        panic!("fitness function failed")
    }
}

#[test]
#[should_panic(expected = "fitness function failed")]
fn test_fitness_panic_fails_the_run() {
    let mut solver = Solver::new();
    solver.set_problem(Exploding {
        descriptor: ProblemDescriptor::new(
            "Exploding",
            2,
            Objective::Maximize,
            Box::new(RandomGenerator::new(0)),
        ),
    });
    solver.set_population_size(4);
    solver.set_epochs(1);
    let _ = solver.run();
}
