//! Benchmark Harness - runs the three kernels in a fixed sequence
//!
//! ```text
//! Start ──▶ Sieve ──▶ MatrixMultiply ──▶ Mandelbrot ──▶ Summary ──▶ End
//! ```
//!
//! Every stage is bracketed by the [`TimeSource`]. A failing stage is
//! reported and the run moves on; no stage depends on another's output.

use std::fmt;
use std::io::{self, Write};

use crate::clock::TimeSource;
use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::mandelbrot::{self, RenderReport};
use crate::matrix::{self, MatrixReport};
use crate::perf::StageTimings;
use crate::sieve;

/// Harness states, visited strictly in declaration order with no branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Sieve,
    MatrixMultiply,
    Mandelbrot,
    Summary,
    End,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "Start",
            Stage::Sieve => "Sieve",
            Stage::MatrixMultiply => "Matrix multiply",
            Stage::Mandelbrot => "Mandelbrot",
            Stage::Summary => "Summary",
            Stage::End => "End",
        };
        f.write_str(name)
    }
}

/// Per-kernel results of a full run.
#[derive(Debug)]
pub struct RunSummary {
    pub primes: Result<usize, BenchError>,
    pub matrix: Result<MatrixReport, BenchError>,
    pub mandelbrot: Result<RenderReport, BenchError>,
    pub timings: StageTimings,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed_stages().is_empty()
    }

    pub fn failed_stages(&self) -> Vec<Stage> {
        let mut failed = Vec::new();
        if self.primes.is_err() {
            failed.push(Stage::Sieve);
        }
        if self.matrix.is_err() {
            failed.push(Stage::MatrixMultiply);
        }
        if self.mandelbrot.is_err() {
            failed.push(Stage::Mandelbrot);
        }
        failed
    }
}

/// Sequences the kernels and writes the console report to `out`.
pub struct Harness<C: TimeSource> {
    config: BenchConfig,
    clock: C,
}

impl<C: TimeSource> Harness<C> {
    pub fn new(config: BenchConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Run every stage once. Kernel failures are recorded in the summary;
    /// only a failure to write the report itself is returned as an error.
    pub fn run<W: Write>(&self, out: &mut W) -> io::Result<RunSummary> {
        let mut timings = StageTimings::new();

        enter(Stage::Start);
        self.start(out)?;

        enter(Stage::Sieve);
        let primes = self.sieve_stage(out, &mut timings)?;

        enter(Stage::MatrixMultiply);
        let matrix = self.matrix_stage(out, &mut timings)?;

        enter(Stage::Mandelbrot);
        let mandelbrot = self.mandelbrot_stage(out, &mut timings)?;

        let summary = RunSummary {
            primes,
            matrix,
            mandelbrot,
            timings,
        };
        enter(Stage::Summary);
        self.summary_stage(out, &summary)?;

        enter(Stage::End);
        out.flush()?;
        Ok(summary)
    }

    fn start<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let cfg = &self.config;
        tracing::info!(
            sieve_limit = cfg.sieve_limit,
            matrix_size = cfg.matrix_size,
            width = cfg.image_width,
            height = cfg.image_height,
            max_iterations = cfg.max_iterations,
            "benchmark run starting"
        );
        writeln!(out, "CPU micro-benchmark start")?;
        writeln!(
            out,
            "SIEVE_LIMIT={} MAT_SIZE={} MAN={}x{}",
            cfg.sieve_limit, cfg.matrix_size, cfg.image_width, cfg.image_height
        )
    }

    fn sieve_stage<W: Write>(
        &self,
        out: &mut W,
        timings: &mut StageTimings,
    ) -> io::Result<Result<usize, BenchError>> {
        let limit = self.config.sieve_limit;
        writeln!(out, "[1/3] Running sieve up to {} ...", limit)?;

        let t0 = self.clock.now();
        let result = sieve::count_primes(limit);
        let elapsed = self.clock.elapsed_since(t0);

        match &result {
            Ok(count) => {
                timings.record_sieve(elapsed);
                writeln!(out, "Found {} primes up to {} ({:.3} s)", count, limit, elapsed)?;
                if tracing::enabled!(tracing::Level::DEBUG) {
                    // Outside the timed bracket
                    let largest = sieve::sieve_primes(limit)
                        .ok()
                        .and_then(|primes| primes.last().copied());
                    tracing::debug!(limit, count, largest, "sieve finished");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "sieve stage failed");
                writeln!(out, "{} failed: {} ({:.3} s)", Stage::Sieve, e, elapsed)?;
            }
        }
        Ok(result)
    }

    fn matrix_stage<W: Write>(
        &self,
        out: &mut W,
        timings: &mut StageTimings,
    ) -> io::Result<Result<MatrixReport, BenchError>> {
        let size = self.config.matrix_size;
        writeln!(out, "[2/3] Matrix multiply {}x{} ...", size, size)?;

        let t0 = self.clock.now();
        let result = matrix::run(size, &self.clock);
        let measured = self.clock.elapsed_since(t0);

        match &result {
            Ok(report) => {
                timings.record_matrix(measured);
                writeln!(out, "Matrix multiply checksum (sample): {:.6}", report.checksum)?;
                writeln!(
                    out,
                    "Matrix multiply took {:.3} s (measured {:.3} s)",
                    report.elapsed_secs, measured
                )?;
            }
            Err(e) => {
                tracing::error!(error = %e, "matrix stage failed");
                writeln!(
                    out,
                    "{} failed: {} ({:.3} s)",
                    Stage::MatrixMultiply,
                    e,
                    measured
                )?;
            }
        }
        Ok(result)
    }

    fn mandelbrot_stage<W: Write>(
        &self,
        out: &mut W,
        timings: &mut StageTimings,
    ) -> io::Result<Result<RenderReport, BenchError>> {
        let cfg = &self.config;
        writeln!(
            out,
            "[3/3] Generating Mandelbrot PPM ({}x{}) ...",
            cfg.image_width, cfg.image_height
        )?;

        let t0 = self.clock.now();
        let result = mandelbrot::render(
            &cfg.image_path,
            cfg.image_width,
            cfg.image_height,
            cfg.max_iterations,
            &self.clock,
        );
        let elapsed = self.clock.elapsed_since(t0);

        match &result {
            Ok(report) => {
                timings.record_mandelbrot(elapsed);
                writeln!(
                    out,
                    "Mandelbrot wrote {} ({:.3} s)",
                    report.path.display(),
                    elapsed
                )?;
            }
            Err(e) => {
                tracing::error!(error = %e, "mandelbrot stage failed");
                writeln!(out, "{} failed: {} ({:.3} s)", Stage::Mandelbrot, e, elapsed)?;
            }
        }
        Ok(result)
    }

    fn summary_stage<W: Write>(&self, out: &mut W, summary: &RunSummary) -> io::Result<()> {
        let primes = match &summary.primes {
            Ok(count) => count.to_string(),
            Err(_) => "n/a".to_string(),
        };
        let mat_time = secs_or_na(summary.matrix.as_ref().ok().map(|r| r.elapsed_secs));
        let man_time = secs_or_na(summary.timings.mandelbrot_secs);

        writeln!(out, "All tasks done. Summary:")?;
        writeln!(
            out,
            " primes={}, mat_time={}, mandelbrot_time={}",
            primes, mat_time, man_time
        )?;

        let (sieve_pct, matrix_pct, mandelbrot_pct) = summary.timings.breakdown_pct();
        tracing::info!(
            total_secs = summary.timings.total_secs(),
            sieve_pct,
            matrix_pct,
            mandelbrot_pct,
            failed = summary.failed_stages().len(),
            "benchmark run finished"
        );
        Ok(())
    }
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "entering stage");
}

fn secs_or_na(secs: Option<f64>) -> String {
    match secs {
        Some(v) => format!("{:.3} s", v),
        None => "n/a".to_string(),
    }
}
