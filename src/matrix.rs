//! Dense Matrix Multiply - deterministic i-k-j kernel with sampled checksum
//!
//! # Reproducibility
//!
//! The checksum is only comparable across runs (and across implementations)
//! when two things are preserved exactly:
//!
//! 1. **Initialisation interleaving**: per cell, one LCG step for `A`, then one
//!    for `B`, in row-major order.
//! 2. **Accumulation order**: `i`, then `k`, then `j`, accumulating into a
//!    zeroed `C`. Other orders give the same product mathematically but round
//!    differently.

use crate::clock::TimeSource;
use crate::error::{BenchError, try_alloc};
use crate::lcg::Lcg;

/// Square row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    size: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `size x size` matrix.
    pub fn zeros(size: usize) -> Result<Self, BenchError> {
        let len = cell_count(size)?;
        Ok(Self {
            size,
            data: try_alloc("matrix", len, 0.0)?,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

fn cell_count(size: usize) -> Result<usize, BenchError> {
    size.checked_mul(size).ok_or(BenchError::Allocation {
        what: "matrix",
        elements: usize::MAX,
    })
}

/// Build the input pair `(A, B)` from an LCG seeded with `seed`.
///
/// For each cell in row-major order the generator is advanced once for `A`
/// and once for `B`.
pub fn generate_pair(size: usize, seed: u32) -> Result<(Matrix, Matrix), BenchError> {
    let mut a = Matrix::zeros(size)?;
    let mut b = Matrix::zeros(size)?;
    let mut rng = Lcg::new(seed);
    for (a_cell, b_cell) in a.data.iter_mut().zip(b.data.iter_mut()) {
        *a_cell = rng.next_cell();
        *b_cell = rng.next_cell();
    }
    Ok((a, b))
}

/// Accumulate `A * B` into `c` using the i-k-j loop order.
///
/// All three matrices must share the same size.
pub fn multiply_ikj(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let n = a.size;
    debug_assert!(b.size == n && c.size == n, "matrix size mismatch");
    for i in 0..n {
        let c_row = &mut c.data[i * n..(i + 1) * n];
        for k in 0..n {
            let aik = a.data[i * n + k];
            let b_row = &b.data[k * n..(k + 1) * n];
            for (c_ij, &b_kj) in c_row.iter_mut().zip(b_row) {
                *c_ij += aik * b_kj;
            }
        }
    }
}

/// Textbook i-j-k product, used to verify [`multiply_ikj`].
pub fn reference_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, BenchError> {
    let n = a.size;
    let mut c = Matrix::zeros(n)?;
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a.get(i, k) * b.get(k, j);
            }
            c.data[i * n + j] = sum;
        }
    }
    Ok(c)
}

/// Sum of `C[i, i mod size]` for rows `i` sampled at stride `max(1, size / 8)`.
pub fn sampled_checksum(c: &Matrix) -> f64 {
    let n = c.size;
    if n == 0 {
        return 0.0;
    }
    let stride = (n / 8).max(1);
    (0..n).step_by(stride).map(|i| c.get(i, i % n)).sum()
}

/// Result of one multiply run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixReport {
    pub size: usize,
    /// Seconds spent in the multiply only (excludes allocation and init)
    pub elapsed_secs: f64,
    pub checksum: f64,
}

/// Allocate, initialise, multiply and checksum a `size x size` problem.
///
/// Only the multiply is timed. All buffers are dropped before returning.
pub fn run<C: TimeSource>(size: usize, clock: &C) -> Result<MatrixReport, BenchError> {
    let (a, b) = generate_pair(size, Lcg::MATRIX_SEED)?;
    let mut c = Matrix::zeros(size)?;

    let t0 = clock.now();
    multiply_ikj(&a, &b, &mut c);
    let elapsed_secs = clock.elapsed_since(t0);

    let checksum = sampled_checksum(&c);
    tracing::debug!(size, elapsed_secs, checksum, "matrix multiply finished");

    Ok(MatrixReport {
        size,
        elapsed_secs,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_generate_pair_interleaving() {
        let (a, b) = generate_pair(2, Lcg::MATRIX_SEED).unwrap();
        let mut rng = Lcg::new(Lcg::MATRIX_SEED);
        for i in 0..4 {
            assert_eq!(a.as_slice()[i], rng.next_cell());
            assert_eq!(b.as_slice()[i], rng.next_cell());
        }
    }

    #[test]
    fn test_size_4_matches_reference() {
        let (a, b) = generate_pair(4, Lcg::MATRIX_SEED).unwrap();
        let mut c = Matrix::zeros(4).unwrap();
        multiply_ikj(&a, &b, &mut c);
        let expected = reference_multiply(&a, &b).unwrap();
        for (x, y) in c.as_slice().iter().zip(expected.as_slice()) {
            assert!((x - y).abs() < 1e-9, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_identity_multiply() {
        let (a, _) = generate_pair(3, 99).unwrap();
        let mut id = Matrix::zeros(3).unwrap();
        for i in 0..3 {
            id.data[i * 3 + i] = 1.0;
        }
        let mut c = Matrix::zeros(3).unwrap();
        multiply_ikj(&a, &id, &mut c);
        assert_eq!(c, a);
    }

    #[test]
    fn test_checksum_stride() {
        // size 16 -> stride 2, samples rows 0,2,..,14 on the diagonal
        let mut c = Matrix::zeros(16).unwrap();
        for i in 0..16 {
            c.data[i * 16 + i] = i as f64;
        }
        assert_eq!(sampled_checksum(&c), (0..16).step_by(2).sum::<usize>() as f64);

        // size <= 8 -> stride 1, every diagonal entry
        let mut small = Matrix::zeros(5).unwrap();
        for i in 0..5 {
            small.data[i * 5 + i] = 1.0;
        }
        assert_eq!(sampled_checksum(&small), 5.0);
    }

    #[test]
    fn test_run_deterministic() {
        let clock = ManualClock::new(0.0, 0.125);
        let r1 = run(32, &clock).unwrap();
        let r2 = run(32, &clock).unwrap();
        assert_eq!(r1.checksum, r2.checksum);
        assert_eq!(r1.elapsed_secs, 0.125);
        assert_eq!(r1.size, 32);
    }

    #[test]
    fn test_run_zero_size() {
        let clock = ManualClock::new(0.0, 0.0);
        let report = run(0, &clock).unwrap();
        assert_eq!(report.checksum, 0.0);
        assert_eq!(report.elapsed_secs, 0.0);
    }

    #[test]
    fn test_overflowing_size_is_error() {
        let err = Matrix::zeros(usize::MAX).unwrap_err();
        assert!(matches!(err, BenchError::Allocation { what: "matrix", .. }));
    }
}
