//! Injectable random source for fallback selection, masonry spans and mock pins

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of uniformly distributed indices
pub trait RandomSource {
    /// Next raw 64-bit value
    fn next_u64(&mut self) -> u64;

    /// Uniform index in `0..bound`. Returns 0 for an empty bound.
    fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u64() % bound as u64) as usize
    }

    /// Uniform value in the inclusive range `min..=max`
    fn next_in_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (self.next_u64() % span) as u32
    }
}

/// xorshift64* generator, seedable for reproducible output
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    /// Create a generator from a fixed seed
    pub fn seeded(seed: u64) -> Self {
        // Zero is a fixed point of xorshift
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    /// Create a generator seeded from the system clock
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(nanos)
    }
}

impl Default for XorShiftRng {
    fn default() -> Self {
        Self::from_clock()
    }
}

impl RandomSource for XorShiftRng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}
