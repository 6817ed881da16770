//! 32-bit Linear Congruential Generator (LCG)
//!
//! Deterministic pseudo-random source for matrix initialisation. The same
//! seed yields the same sequence on every run and every target.
//!
//! # Algorithm
//!
//! LCG formula: `state = state * 1103515245 + 12345 (mod 2^32)`
//!
//! # Example
//!
//! ```rust
//! use cpu_microbench::lcg::Lcg;
//!
//! let mut rng = Lcg::new(Lcg::MATRIX_SEED);
//! let value = rng.next_u32() % 1000;
//! assert!(value < 1000);
//! ```

/// Linear congruential generator over a single `u32` state.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// LCG multiplier
    const MULTIPLIER: u32 = 1_103_515_245;

    /// LCG increment
    const INCREMENT: u32 = 12_345;

    /// Seed used for matrix initialisation
    pub const MATRIX_SEED: u32 = 123_456_789;

    /// Create a generator whose state is exactly `seed`.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the state once and return it.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Advance once and map the state to a matrix cell value in `[0.0, 9.99]`.
    ///
    /// Equivalent to `(state % 1000) / 100.0`.
    #[inline]
    pub fn next_cell(&mut self) -> f64 {
        f64::from(self.next_u32() % 1000) / 100.0
    }

    /// Current state without advancing.
    pub fn state(&self) -> u32 {
        self.state
    }
}
