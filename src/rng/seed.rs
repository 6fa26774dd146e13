//! Seed derivation for freshly spawned streams.
//!
//! The solver reseeds a stream for every new candidate and every hill-climb trial.
//! Where those seeds come from is a policy: [`ClockSeeds`] follows the wall clock and
//! gives a different run every time, [`SplitMixSeeds`] replays the same run for the
//! same base seed.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 mixer.
#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(GOLDEN_GAMMA);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A source of seeds for newly spawned random streams.
pub trait SeedSequence: Debug + Send {
    /// Returns the next seed.
    fn next_seed(&mut self) -> i64;
}

/// Seeds derived from the current wall-clock time in nanoseconds.
///
/// Runs are not reproducible. A process-wide call counter is mixed in so that seeds
/// drawn within the same clock tick still differ, across instances too.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockSeeds;

static CLOCK_DRAWS: AtomicU64 = AtomicU64::new(0);

impl SeedSequence for ClockSeeds {
    fn next_seed(&mut self) -> i64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        let draw = CLOCK_DRAWS.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        (nanos ^ splitmix64(draw)) as i64
    }
}

/// A deterministic SplitMix64 sequence starting from a base seed.
#[derive(Debug, Clone)]
pub struct SplitMixSeeds {
    state: u64,
}

impl SplitMixSeeds {
    pub fn new(base: i64) -> Self {
        Self { state: base as u64 }
    }
}

impl SeedSequence for SplitMixSeeds {
    fn next_seed(&mut self) -> i64 {
        let seed = splitmix64(self.state);
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        seed as i64
    }
}
