use std::num::NonZeroU64;

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;

use super::{Algorithm, ClockSeeds, RandomStream, SeedSequence, WeylRng};

/// A `rand` source that can back a [`Generator`].
pub trait StreamSource: RngCore + SeedableRng + Clone + std::fmt::Debug + Send + Sync + 'static {
    /// The family reported by streams built on this source.
    const ALGORITHM: Algorithm;
}

impl StreamSource for StdRng {
    const ALGORITHM: Algorithm = Algorithm::Standard;
}

impl StreamSource for WeylRng {
    const ALGORITHM: Algorithm = Algorithm::Weyl;
}

/// A [`RandomStream`] backed by any seedable `rand` source.
///
/// Use the [`RandomGenerator`] and [`WeylGenerator`] aliases rather than naming the
/// source directly.
#[derive(Debug, Clone)]
pub struct Generator<R> {
    rng: R,
    seed: i64,
}

/// General-purpose pseudorandom stream.
pub type RandomGenerator = Generator<StdRng>;

/// Quasi-random stream built on the Middle-Square Weyl Sequence.
pub type WeylGenerator = Generator<WeylRng>;

impl<R: StreamSource> Generator<R> {
    /// Creates a stream seeded with `seed`.
    pub fn new(seed: i64) -> Self {
        Self {
            rng: R::seed_from_u64(seed as u64),
            seed,
        }
    }

    /// Creates a stream seeded from the wall clock.
    pub fn from_clock() -> Self {
        Self::new(ClockSeeds::default().next_seed())
    }
}

impl<R: StreamSource> Default for Generator<R> {
    fn default() -> Self {
        Self::from_clock()
    }
}

impl<R: StreamSource> RandomStream for Generator<R> {
    fn seed(&self) -> i64 {
        self.seed
    }

    fn algorithm(&self) -> Algorithm {
        R::ALGORITHM
    }

    fn uniform_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn next_below(&mut self, bound: NonZeroU64) -> u64 {
        self.rng.gen_range(0..bound.get())
    }

    fn normal_float(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    fn reseeded(&self, seed: i64) -> Box<dyn RandomStream> {
        Box::new(Self::new(seed))
    }

    fn box_clone(&self) -> Box<dyn RandomStream> {
        Box::new(self.clone())
    }
}
