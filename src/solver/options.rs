//! # SolverOptions
//!
//! The `SolverOptions` struct holds the tunable policies of the evolutionary loop:
//! how many epochs to run, the population size, the breadth of each hill climb, the
//! fraction of the population replaced per generation, the mutation decay curve and
//! the size of the worker pool.
//!
//! ## Example
//!
//! ```rust
//! use evosolve::solver::options::{CloneCount, DecayCurve, Epochs, SolverOptions};
//!
//! // Create a new SolverOptions instance with custom parameters
//! let options = SolverOptions::builder()
//!     .epochs(Epochs::Limited(50))
//!     .population_size(40)
//!     .clone_count(CloneCount::Fixed(8))
//!     .decay(DecayCurve::Linear)
//!     .num_threads(4)
//!     .build();
//! assert!(options.validate().is_ok());
//!
//! // Create a new SolverOptions instance with default parameters
//! let defaults = SolverOptions::default();
//! assert_eq!(defaults.replace_count(), 10);
//! ```
//!
//! ## Mutation decay
//!
//! The mutation probability of the candidate at `rank` is
//! `exp(-mutation_scale * decay(rank, size))`, where the decay never grows as the rank
//! gets worse, so weaker candidates mutate at least as aggressively as stronger ones.
//! [`DecayCurve::Truncating`] evaluates `(size - rank) / size` in integer arithmetic,
//! which only yields 1 (rank 0) or 0 (every other rank). [`DecayCurve::Linear`]
//! evaluates the same ratio in floating point for a smooth curve.

use crate::error::{EvolutionError, Result};

/// The epoch budget of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Epochs {
    /// Evolve while the generation counter is below the limit.
    Limited(usize),
    /// Evolve forever.
    Unbounded,
}

impl Epochs {
    /// Whether another generation may run after `generation`.
    pub fn allows(self, generation: usize) -> bool {
        match self {
            Epochs::Limited(limit) => generation < limit,
            Epochs::Unbounded => true,
        }
    }
}

impl Default for Epochs {
    fn default() -> Self {
        Epochs::Limited(100)
    }
}

impl From<usize> for Epochs {
    fn from(limit: usize) -> Self {
        Epochs::Limited(limit)
    }
}

/// `-1` means unbounded; any other negative value clamps to zero epochs.
impl From<i64> for Epochs {
    fn from(epochs: i64) -> Self {
        match epochs {
            -1 => Epochs::Unbounded,
            n if n < 0 => Epochs::Limited(0),
            n => Epochs::Limited(n as usize),
        }
    }
}

impl From<i32> for Epochs {
    fn from(epochs: i32) -> Self {
        Epochs::from(i64::from(epochs))
    }
}

/// How many trial clones each candidate spawns per hill climb.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloneCount {
    /// As many clones as the population has members.
    #[default]
    PopulationSize,
    Fixed(usize),
}

impl CloneCount {
    pub fn resolve(self, population_size: usize) -> usize {
        match self {
            CloneCount::PopulationSize => population_size,
            CloneCount::Fixed(count) => count,
        }
    }
}

/// Maps a rank onto the decay factor of the mutation probability.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecayCurve {
    /// `(size - rank) / size` in integer arithmetic.
    #[default]
    Truncating,
    /// `(size - rank) / size` in floating point.
    Linear,
}

impl DecayCurve {
    pub fn decay(self, rank: usize, size: usize) -> f64 {
        if size == 0 {
            return 0.0;
        }
        let remaining = size.saturating_sub(rank);
        match self {
            DecayCurve::Truncating => (remaining / size) as f64,
            DecayCurve::Linear => remaining as f64 / size as f64,
        }
    }
}

const DEFAULT_POPULATION_SIZE: usize = 100;
const DEFAULT_REPLACEMENT_RATE: f64 = 0.1;
const DEFAULT_MUTATION_SCALE: f64 = 2.4;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    epochs: Epochs,
    population_size: usize,
    clone_count: CloneCount,
    /// Fraction of the population replaced by fresh candidates each generation
    replacement_rate: f64,
    decay: DecayCurve,
    mutation_scale: f64,
    /// Worker pool size, `None` for rayon's global pool
    num_threads: Option<usize>,
}

impl SolverOptions {
    pub fn new(epochs: impl Into<Epochs>, population_size: usize) -> Self {
        Self {
            epochs: epochs.into(),
            population_size,
            ..Self::default()
        }
    }

    pub fn epochs(&self) -> Epochs {
        self.epochs
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn clone_count(&self) -> CloneCount {
        self.clone_count
    }

    pub fn replacement_rate(&self) -> f64 {
        self.replacement_rate
    }

    pub fn decay(&self) -> DecayCurve {
        self.decay
    }

    pub fn mutation_scale(&self) -> f64 {
        self.mutation_scale
    }

    pub fn num_threads(&self) -> Option<usize> {
        self.num_threads
    }

    /// Number of trial clones per candidate for the configured population size.
    pub fn trials_per_candidate(&self) -> usize {
        self.clone_count.resolve(self.population_size)
    }

    /// `floor(replacement_rate * population_size)`.
    pub fn replace_count(&self) -> usize {
        (self.replacement_rate * self.population_size as f64).floor() as usize
    }

    /// Mutation probability of the candidate at `rank` within `size` candidates.
    pub fn mutation_probability(&self, rank: usize, size: usize) -> f64 {
        (-self.mutation_scale * self.decay.decay(rank, size)).exp()
    }

    pub fn set_epochs(&mut self, epochs: impl Into<Epochs>) {
        self.epochs = epochs.into();
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_clone_count(&mut self, clone_count: CloneCount) {
        self.clone_count = clone_count;
    }

    pub fn set_replacement_rate(&mut self, replacement_rate: f64) {
        self.replacement_rate = replacement_rate;
    }

    pub fn set_decay(&mut self, decay: DecayCurve) {
        self.decay = decay;
    }

    pub fn set_mutation_scale(&mut self, mutation_scale: f64) {
        self.mutation_scale = mutation_scale;
    }

    pub fn set_num_threads(&mut self, num_threads: Option<usize>) {
        self.num_threads = num_threads;
    }

    /// Checks the policies that have no safe fallback.
    ///
    /// A zero population size is not rejected here; it is a precondition of
    /// [`Solver::run`](crate::solver::Solver::run).
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.replacement_rate) {
            return Err(EvolutionError::InvalidArgument(format!(
                "Replacement rate must be within [0, 1], got {}",
                self.replacement_rate
            )));
        }

        if !self.mutation_scale.is_finite() {
            return Err(EvolutionError::InvalidArgument(format!(
                "Mutation scale must be finite, got {}",
                self.mutation_scale
            )));
        }

        if self.clone_count == CloneCount::Fixed(0) {
            return Err(EvolutionError::InvalidArgument(
                "Clone count must be greater than 0".to_string(),
            ));
        }

        if self.num_threads == Some(0) {
            return Err(EvolutionError::InvalidArgument(
                "Worker pool needs at least one thread".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a builder for creating a `SolverOptions` instance.
    pub fn builder() -> SolverOptionsBuilder {
        SolverOptionsBuilder::default()
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            epochs: Epochs::default(),
            population_size: DEFAULT_POPULATION_SIZE,
            clone_count: CloneCount::PopulationSize,
            replacement_rate: DEFAULT_REPLACEMENT_RATE,
            decay: DecayCurve::Truncating,
            mutation_scale: DEFAULT_MUTATION_SCALE,
            num_threads: None,
        }
    }
}

/// Builder for `SolverOptions`.
///
/// Provides a fluent interface for constructing `SolverOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct SolverOptionsBuilder {
    epochs: Option<Epochs>,
    population_size: Option<usize>,
    clone_count: Option<CloneCount>,
    replacement_rate: Option<f64>,
    decay: Option<DecayCurve>,
    mutation_scale: Option<f64>,
    num_threads: Option<usize>,
}

impl SolverOptionsBuilder {
    pub fn epochs(mut self, value: impl Into<Epochs>) -> Self {
        self.epochs = Some(value.into());
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn clone_count(mut self, value: CloneCount) -> Self {
        self.clone_count = Some(value);
        self
    }

    pub fn replacement_rate(mut self, value: f64) -> Self {
        self.replacement_rate = Some(value);
        self
    }

    pub fn decay(mut self, value: DecayCurve) -> Self {
        self.decay = Some(value);
        self
    }

    pub fn mutation_scale(mut self, value: f64) -> Self {
        self.mutation_scale = Some(value);
        self
    }

    /// Runs every parallel phase on a dedicated pool of `value` workers.
    pub fn num_threads(mut self, value: usize) -> Self {
        self.num_threads = Some(value);
        self
    }

    /// Builds the `SolverOptions` instance.
    pub fn build(self) -> SolverOptions {
        SolverOptions {
            epochs: self.epochs.unwrap_or_default(),
            population_size: self.population_size.unwrap_or(DEFAULT_POPULATION_SIZE),
            clone_count: self.clone_count.unwrap_or_default(),
            replacement_rate: self.replacement_rate.unwrap_or(DEFAULT_REPLACEMENT_RATE),
            decay: self.decay.unwrap_or_default(),
            mutation_scale: self.mutation_scale.unwrap_or(DEFAULT_MUTATION_SCALE),
            num_threads: self.num_threads,
        }
    }
}
