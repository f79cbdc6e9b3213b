//! Injectable pseudo-random source for animation timing.

/// Trait for abstracting random number generation.
///
/// Implement this for a hardware RNG on target, or use [`XorShift32`] when a
/// reproducible sequence is wanted.
pub trait RandomSource {
    /// Returns the next 32 random bits.
    fn next_u32(&mut self) -> u32;

    /// Returns a value in `lo..=hi`. Returns `lo` if the range is inverted.
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = u64::from(hi - lo) + 1;
        lo + (u64::from(self.next_u32()) % span) as u32
    }
}

/// Marsaglia xorshift generator. Small, fast and seedable.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Creates a generator from `seed`. A zero seed is replaced, since zero is
    /// a fixed point of the recurrence.
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}
