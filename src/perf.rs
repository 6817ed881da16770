//! Stage Timings - per-stage elapsed time and breakdown
//!
//! Bookkeeping only; the kernels themselves never read it.

/// Elapsed seconds per harness stage. `None` means the stage failed.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StageTimings {
    pub sieve_secs: Option<f64>,
    /// Wall time around the whole matrix stage (allocation + init + multiply)
    pub matrix_stage_secs: Option<f64>,
    pub mandelbrot_secs: Option<f64>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_sieve(&mut self, secs: f64) {
        self.sieve_secs = Some(secs);
    }

    #[inline]
    pub fn record_matrix(&mut self, secs: f64) {
        self.matrix_stage_secs = Some(secs);
    }

    #[inline]
    pub fn record_mandelbrot(&mut self, secs: f64) {
        self.mandelbrot_secs = Some(secs);
    }

    /// Sum of all recorded stages
    pub fn total_secs(&self) -> f64 {
        [self.sieve_secs, self.matrix_stage_secs, self.mandelbrot_secs]
            .into_iter()
            .flatten()
            .sum()
    }

    /// Percentage share of (sieve, matrix, mandelbrot) in the recorded total.
    /// Failed stages count as zero.
    pub fn breakdown_pct(&self) -> (f64, f64, f64) {
        let total = self.total_secs();
        if total == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let pct = |v: Option<f64>| v.unwrap_or(0.0) / total * 100.0;
        (
            pct(self.sieve_secs),
            pct(self.matrix_stage_secs),
            pct(self.mandelbrot_secs),
        )
    }
}
