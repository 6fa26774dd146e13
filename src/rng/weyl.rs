use rand::{Error, RngCore, SeedableRng};

use super::splitmix64;

/// Middle-Square Weyl Sequence generator (Widynski).
///
/// Squares the state, adds the next term of a Weyl sequence `w += s` and swaps the
/// halves of the result. Each step yields 32 bits. The increment `s` must be odd; it
/// is derived from the seed with SplitMix64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeylRng {
    x: u64,
    w: u64,
    s: u64,
}

impl WeylRng {
    fn with_increment(seed: u64) -> Self {
        Self {
            x: 0,
            w: 0,
            s: splitmix64(seed) | 1,
        }
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.w = self.w.wrapping_add(self.s);
        self.x = self.x.wrapping_mul(self.x).wrapping_add(self.w);
        self.x = self.x.rotate_right(32);
        self.x as u32
    }
}

impl RngCore for WeylRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.step());
        let low = u64::from(self.step());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for WeylRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::with_increment(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::with_increment(state)
    }
}
