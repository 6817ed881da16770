//! cpu_microbench - deterministic single-threaded CPU micro-benchmark
//!
//! Three independent kernels, run once each in a fixed order and timed:
//!
//! - [`sieve`] - Sieve of Eratosthenes prime count
//! - [`matrix`] - dense i-k-j matrix multiply with sampled checksum
//! - [`mandelbrot`] - escape-time fractal written as a P6 PPM image
//!
//! Supporting modules:
//!
//! - [`clock`] - injectable monotonic time source
//! - [`lcg`] - 32-bit LCG used for matrix initialisation
//! - [`harness`] - stage sequencing and console report
//! - [`perf`] - per-stage timing breakdown
//! - [`config`] / [`logging`] - fixed parameters and tracing setup

pub mod clock;
pub mod config;
pub mod error;
pub mod harness;
pub mod lcg;
pub mod logging;
pub mod mandelbrot;
pub mod matrix;
pub mod perf;
pub mod sieve;

// Convenient re-exports at crate root
pub use clock::{ManualClock, MonotonicClock, TimeSource};
pub use config::{AppConfig, BenchConfig};
pub use error::{BenchError, ConfigError};
pub use harness::{Harness, RunSummary, Stage};
pub use mandelbrot::{Pixel, RenderReport};
pub use matrix::{Matrix, MatrixReport};
pub use perf::StageTimings;
pub use sieve::count_primes;
