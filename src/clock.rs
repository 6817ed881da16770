//! Time sources for stage timing
//!
//! Values are seconds on a monotonic clock and only meaningful as
//! differences. [`MonotonicClock`] is the production source; [`ManualClock`]
//! is a deterministic source for tests.

use std::cell::Cell;
use std::time::Instant;

/// A monotonic, non-decreasing source of elapsed seconds.
pub trait TimeSource {
    /// Current reading in seconds. Never smaller than a previous reading.
    fn now(&self) -> f64;

    /// Seconds elapsed since `start`, a reading previously taken from `self`.
    fn elapsed_since(&self, start: f64) -> f64 {
        (self.now() - start).max(0.0)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Production clock backed by [`Instant`]. Readings are seconds since creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    #[inline]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Deterministic clock: every `now()` returns the current value and then
/// advances it by `step` seconds.
#[derive(Debug)]
pub struct ManualClock {
    current: Cell<f64>,
    step: f64,
}

impl ManualClock {
    /// `step` must be non-negative; negative steps are treated as zero.
    pub fn new(start: f64, step: f64) -> Self {
        Self {
            current: Cell::new(start),
            step: step.max(0.0),
        }
    }

    /// Move the clock forward by `secs` without taking a reading.
    pub fn advance(&self, secs: f64) {
        self.current.set(self.current.get() + secs.max(0.0));
    }

    /// Number of seconds the clock moves per reading.
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> f64 {
        let value = self.current.get();
        self.current.set(value + self.step);
        value
    }
}
