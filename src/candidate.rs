//! # Candidate Trait
//!
//! A `Candidate` is one encoded solution together with its fitness. The encoding is
//! problem specific and opaque to the solver, which only needs to generate, mutate and
//! clone candidates.
//!
//! The state every candidate shares (identity, fitness, dimensionality and its own
//! random stream) lives in a [`CandidateCore`]. Implementations embed one and hand it
//! out through [`Candidate::core`] and [`Candidate::core_mut`]; the remaining
//! accessors are provided by the trait.
//!
//! ## Example
//!
//! ```rust
//! use evosolve::candidate::{Candidate, CandidateCore};
//! use evosolve::rng::{RandomGenerator, RandomStream};
//!
//! #[derive(Clone, Debug)]
//! struct Point {
//!     core: CandidateCore,
//!     coords: Vec<f64>,
//! }
//!
//! impl Candidate for Point {
//!     type Phenotype = [f64];
//!
//!     fn core(&self) -> &CandidateCore {
//!         &self.core
//!     }
//!
//!     fn core_mut(&mut self) -> &mut CandidateCore {
//!         &mut self.core
//!     }
//!
//!     fn generate(&mut self) {
//!         let dimensions = self.core.dimensions();
//!         let stream = self.core.stream();
//!         let coords = (0..dimensions)
//!             .map(|_| stream.ranged_float(-1.0, 1.0))
//!             .collect();
//!         self.coords = coords;
//!     }
//!
//!     fn mutate(&mut self, probability: f64) {
//!         for i in 0..self.coords.len() {
//!             if self.stream().uniform_float() < probability {
//!                 let delta = self.stream().normal_float() * 0.1;
//!                 self.coords[i] += delta;
//!             }
//!         }
//!     }
//!
//!     fn clone_with_stream(&self, stream: Box<dyn RandomStream>) -> Self {
//!         Self {
//!             core: CandidateCore::new(self.dimensions(), stream),
//!             coords: self.coords.clone(),
//!         }
//!     }
//!
//!     fn phenotype(&self) -> &[f64] {
//!         &self.coords
//!     }
//! }
//!
//! let mut point = Point {
//!     core: CandidateCore::new(3, Box::new(RandomGenerator::new(1))),
//!     coords: Vec::new(),
//! };
//! point.generate();
//! assert_eq!(point.phenotype().len(), 3);
//! assert!(point.fitness().is_none());
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::rng::RandomStream;

static NEXT_CANDIDATE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a candidate.
///
/// Cloning a candidate with `Clone` keeps its identity; [`Candidate::clone_with_stream`]
/// creates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(u64);

impl CandidateId {
    fn next() -> Self {
        Self(NEXT_CANDIDATE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State shared by every candidate implementation.
#[derive(Debug, Clone)]
pub struct CandidateCore {
    id: CandidateId,
    fitness: Option<f64>,
    dimensions: usize,
    stream: Box<dyn RandomStream>,
}

impl CandidateCore {
    /// Creates an unevaluated core with a fresh identity that owns `stream`.
    pub fn new(dimensions: usize, stream: Box<dyn RandomStream>) -> Self {
        Self {
            id: CandidateId::next(),
            fitness: None,
            dimensions,
            stream,
        }
    }

    /// The process-unique identity assigned at construction.
    pub fn id(&self) -> CandidateId {
        self.id
    }

    /// The fitness from the last evaluation, `None` if never evaluated or invalidated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Records the result of an evaluation.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Marks the fitness as stale.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// The length of the encoding.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The stream owned exclusively by this candidate.
    pub fn stream(&mut self) -> &mut dyn RandomStream {
        self.stream.as_mut()
    }
}

/// Trait for problem-specific encoded solutions.
///
/// Types implementing this trait must be `Clone`, `Debug`, `Send` and `Sync` so the
/// solver can evaluate and mutate them in parallel.
pub trait Candidate: Clone + Debug + Send + Sync {
    /// The decoded value exposed to callers.
    type Phenotype: ?Sized + Debug;

    /// The shared state backing the provided accessors.
    fn core(&self) -> &CandidateCore;

    fn core_mut(&mut self) -> &mut CandidateCore;

    /// Populates the encoding from the candidate's own stream.
    fn generate(&mut self);

    /// Mutates each locus independently, triggering when a uniform draw falls below
    /// `probability`.
    fn mutate(&mut self, probability: f64);

    /// A deep copy of the encoding bound to `stream`, with a new identity and no
    /// fitness.
    fn clone_with_stream(&self, stream: Box<dyn RandomStream>) -> Self;

    /// The decoded value of the encoding.
    fn phenotype(&self) -> &Self::Phenotype;

    fn id(&self) -> CandidateId {
        self.core().id()
    }

    fn fitness(&self) -> Option<f64> {
        self.core().fitness()
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.core_mut().set_fitness(fitness);
    }

    fn dimensions(&self) -> usize {
        self.core().dimensions()
    }

    fn stream(&mut self) -> &mut dyn RandomStream {
        self.core_mut().stream()
    }
}
