//! Prime Sieve - Sieve of Eratosthenes
//!
//! Flags are indexed `0..=limit`; after sieving, `flags[i]` is true iff `i`
//! is prime. The flag buffer is owned by the call and dropped on return.

use crate::error::{BenchError, try_alloc};

/// Run the sieve and return the flag buffer.
fn sieve_flags(limit: usize) -> Result<Vec<bool>, BenchError> {
    let len = limit.checked_add(1).ok_or(BenchError::Allocation {
        what: "sieve flags",
        elements: usize::MAX,
    })?;
    let mut is_prime = try_alloc("sieve flags", len, true)?;
    is_prime[0] = false;
    is_prime[1] = false;

    let mut p = 2;
    while p * p <= limit {
        if is_prime[p] {
            let mut q = p * p;
            while q <= limit {
                is_prime[q] = false;
                q += p;
            }
        }
        p += 1;
    }
    Ok(is_prime)
}

/// Count primes in `[2, limit]`.
///
/// Returns `Ok(0)` for `limit < 2`. Allocation failure is an error, never a
/// zero count.
pub fn count_primes(limit: usize) -> Result<usize, BenchError> {
    if limit < 2 {
        return Ok(0);
    }
    let is_prime = sieve_flags(limit)?;
    Ok(is_prime[2..].iter().filter(|&&flag| flag).count())
}

/// List primes in `[2, limit]` in ascending order.
pub fn sieve_primes(limit: usize) -> Result<Vec<usize>, BenchError> {
    if limit < 2 {
        return Ok(Vec::new());
    }
    let is_prime = sieve_flags(limit)?;
    Ok(is_prime
        .iter()
        .enumerate()
        .filter_map(|(n, &flag)| flag.then_some(n))
        .collect())
}
