//! # Random Streams
//!
//! Every stochastic decision of the solver (generating candidates, mutating them,
//! immigrating fresh ones) draws from a [`RandomStream`]. A stream is seeded once and
//! exclusively owned by whoever uses it; parallel workers never share one. Instead a
//! stream is [`reseeded`](RandomStream::reseeded) into a new, independent stream of the
//! same algorithm family before it is handed to a new unit of work.
//!
//! Two interchangeable families are provided:
//!
//! - [`RandomGenerator`]: a general-purpose PRNG (`rand`'s `StdRng`) seeded directly.
//! - [`WeylGenerator`]: a Middle-Square Weyl Sequence source. Its additive Weyl
//!   recurrence tends to cover generated populations more evenly at equal sample
//!   counts, but it gives up the independence guarantees of a true PRNG.
//!
//! ## Example
//!
//! ```rust
//! use evosolve::rng::{RandomGenerator, RandomStream, RandomStreamExt, WeylGenerator};
//!
//! let mut rng = RandomGenerator::new(42);
//! let value = rng.ranged_float(-1.0, 1.0);
//! assert!((-1.0..=1.0).contains(&value));
//!
//! let colours = ["red", "green", "blue", "yellow"];
//! let picked = rng.sample_without_replacement(&colours, 2);
//! assert_eq!(picked.len(), 2);
//!
//! // A reseeded stream keeps its family.
//! let weyl = WeylGenerator::new(7);
//! let child = weyl.reseeded(8);
//! assert_eq!(child.algorithm(), weyl.algorithm());
//! ```

mod generator;
mod seed;
mod weyl;

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::num::NonZeroU64;

use crate::error::{EvolutionError, Result};

pub use generator::{Generator, RandomGenerator, StreamSource, WeylGenerator};
pub use seed::{ClockSeeds, SeedSequence, SplitMixSeeds};
pub use weyl::WeylRng;

pub(crate) use seed::splitmix64;

/// The algorithm family behind a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// General-purpose pseudorandom generator.
    Standard,
    /// Middle-Square Weyl Sequence.
    Weyl,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Standard => write!(f, "standard"),
            Algorithm::Weyl => write!(f, "weyl"),
        }
    }
}

/// Linearly maps `value` from `[source_lower, source_upper]` onto
/// `[target_lower, target_upper]`.
///
/// ```rust
/// use evosolve::rng::translate;
///
/// assert_eq!(translate(5.0, 0.0, 10.0, -1.0, 1.0), 0.0);
/// ```
pub fn translate(
    value: f64,
    source_lower: f64,
    source_upper: f64,
    target_lower: f64,
    target_upper: f64,
) -> f64 {
    target_lower
        + (value - source_lower) * ((target_upper - target_lower) / (source_upper - source_lower))
}

/// A seedable, cloneable source of pseudorandom primitives.
///
/// Two streams built from the same seed and algorithm produce identical sequences.
/// The trait is object safe; candidates and problems hold `Box<dyn RandomStream>` so
/// that the algorithm family can be chosen at runtime.
pub trait RandomStream: Debug + Send + Sync {
    /// The seed this stream was constructed from.
    fn seed(&self) -> i64;

    /// The algorithm family of this stream.
    fn algorithm(&self) -> Algorithm;

    /// A uniformly distributed float in `[0, 1)`.
    fn uniform_float(&mut self) -> f64;

    /// A uniformly distributed integer in `[0, bound)`.
    fn next_below(&mut self, bound: NonZeroU64) -> u64;

    /// A float drawn from the standard normal distribution.
    fn normal_float(&mut self) -> f64;

    /// A new stream of the same family seeded with `seed`, independent of `self`.
    fn reseeded(&self, seed: i64) -> Box<dyn RandomStream>;

    /// An exact copy of this stream, including its current position.
    fn box_clone(&self) -> Box<dyn RandomStream>;

    /// A uniformly distributed integer in `[0, n)`.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::InvalidArgument`] when `n <= 0`.
    fn bounded_int(&mut self, n: i64) -> Result<i64> {
        let bound = u64::try_from(n)
            .ok()
            .and_then(NonZeroU64::new)
            .ok_or_else(|| {
                EvolutionError::InvalidArgument(format!("bound must be positive, got {}", n))
            })?;
        Ok(self.next_below(bound) as i64)
    }

    /// An integer between `min` and `max` (inclusive of `min`, never past `max`).
    ///
    /// The bounds may be given in either order; equal bounds return `min`.
    fn ranged_int(&mut self, min: i64, max: i64) -> i64 {
        let span = max.abs_diff(min);
        let Some(bound) = NonZeroU64::new(span) else {
            return min;
        };
        let offset = i128::from(self.next_below(bound));
        // translate(offset, 0, span, min, max) with a slope of exactly +/-1
        let value = if max > min {
            i128::from(min) + offset
        } else {
            i128::from(min) - offset
        };
        value as i64
    }

    /// A float between `min` and `max`.
    ///
    /// The bounds may be given in either order; equal bounds return `min`.
    fn ranged_float(&mut self, min: f64, max: f64) -> f64 {
        let scale = (max - min).abs();
        if scale == 0.0 || !scale.is_finite() {
            return min;
        }
        let value = self.uniform_float() * scale;
        translate(value, 0.0, scale, min, max).clamp(min.min(max), min.max(max))
    }

    /// The integers `0..n` in random order.
    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut values: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let bound = NonZeroU64::new(i as u64 + 1).unwrap_or(NonZeroU64::MIN);
            let j = self.next_below(bound) as usize;
            values.swap(i, j);
        }
        values
    }

    /// Up to `k` distinct indices into a collection of `n` items.
    ///
    /// Returns every index (in order) when `k >= n` and nothing when `k <= 0`.
    /// Selection uses rejection sampling: draws that hit an already chosen index are
    /// discarded, so the expected work grows towards O(k * n) as `k` approaches `n`.
    /// Avoid it for `k` close to a large `n`.
    fn sample_indices(&mut self, n: usize, k: i64) -> Vec<usize> {
        if k >= n as i64 {
            return (0..n).collect();
        }
        if k <= 0 {
            return Vec::new();
        }
        let Some(bound) = NonZeroU64::new(n as u64) else {
            return Vec::new();
        };

        let k = k as usize;
        let mut chosen = HashSet::with_capacity(k);
        let mut selected = Vec::with_capacity(k);
        while selected.len() < k {
            let index = self.next_below(bound) as usize;
            if chosen.insert(index) {
                selected.push(index);
            }
        }
        selected
    }
}

impl Clone for Box<dyn RandomStream> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Generic helpers available on every [`RandomStream`], including trait objects.
pub trait RandomStreamExt: RandomStream {
    /// Up to `k` distinct items of `items`, chosen without replacement.
    ///
    /// See [`RandomStream::sample_indices`] for the fallback rules and cost.
    fn sample_without_replacement<T: Clone>(&mut self, items: &[T], k: i64) -> Vec<T> {
        self.sample_indices(items.len(), k)
            .into_iter()
            .map(|index| items[index].clone())
            .collect()
    }
}

impl<R: RandomStream + ?Sized> RandomStreamExt for R {}
