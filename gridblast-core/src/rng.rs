//! Deterministic random number generation.
//!
//! All room randomness (obstacle layout, bonus drops) flows through one
//! xorshift32 stream so the same seed reproduces the same room on any
//! platform, letting a predicting client regenerate the server's layout.

/// Seeded xorshift32 generator.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Zero is a fixed point of xorshift, so it is remapped.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x0BAD_5EED } else { seed },
        }
    }

    /// Current internal state, for checkpoints and tests.
    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    /// Uniform value in `[0, max)`. `max` must be non-zero.
    pub fn next_int(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        self.next() % max
    }
}
