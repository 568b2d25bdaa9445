//! # P2 — The Semi-Prime Correction Term
//!
//! P₂(x, y) counts, for every prime p in (y, √x], the primes q ≥ p with
//! pq ≤ x:
//!
//!   P₂ = Σ_{y < p ≤ √x} ( π(x/p) − π(p) + 1 )
//!
//! Evaluated by streaming two prime sources against each other: p walks
//! downward from √x while a forward iterator counts π up through the
//! ascending quotients x/p. Neither the primes in (y, √x] nor the π
//! range [√x, x/y] is ever materialized.
//!
//! ## Parallelism
//!
//! The p-range is cut into disjoint descending chunks. A chunk reports
//! (primes seen, Σ of relative π counts, primes in its quotient
//! interval); the main thread chains the interval counts in chunk order
//! to reconstruct the absolute π bases, so the total is independent of
//! the thread count and bit-identical across runs.

use crate::imath::isqrt;
use crate::iterator::PrimeIter;
use rayon::prelude::*;

struct ChunkResult {
    /// Primes p inside the chunk's (lo, hi].
    p_count: u64,
    /// Σ over those p of #primes in (L, x/p], L = ⌊x/hi⌋.
    rel_sum: i128,
    /// #primes in (⌊x/hi⌋, ⌊x/lo⌋], chaining the next chunk's base.
    interval_count: u64,
}

/// P₂(x, y), given π(y) for the prime-index arithmetic.
pub fn p2(x: u128, y: u64, pi_y: u64, threads: usize) -> i128 {
    let sqrtx = isqrt(x);
    if y >= sqrtx {
        return 0;
    }
    debug_assert!(x / y.max(1) as u128 <= u64::MAX as u128);

    // Descending p-chunks (lo, hi]: chunk 0 touches sqrtx, the last one y.
    let threads = threads.max(1);
    let chunks = chunk_bounds(y, sqrtx, threads as u64 * 4);

    let results: Vec<ChunkResult> = chunks
        .par_iter()
        .map(|&(lo, hi)| process_chunk(x, lo, hi))
        .collect();

    // A = pi(sqrtx).
    let a = pi_y;
    let big_a = a + results.iter().map(|r| r.p_count).sum::<u64>();

    // pi(x/sqrtx) seeds the base chain; the gap (sqrtx, x/sqrtx] is at
    // most a few integers wide.
    let l0 = (x / sqrtx as u128) as u64;
    let mut base = big_a as i128 + count_primes_in(sqrtx, l0) as i128;

    let mut sum_pi: i128 = 0;
    for r in &results {
        sum_pi += r.rel_sum + base * r.p_count as i128;
        base += r.interval_count as i128;
    }

    // Σ_{i=a+1}^{A} (i − 1), the prime-index part of the term.
    let a = a as i128;
    let big_a = big_a as i128;
    let index_sum = (big_a * (big_a - 1) - a * (a - 1)) / 2;

    sum_pi - index_sum
}

/// Split (y, sqrtx] into up to `n` descending chunks. Tiny ranges stay
/// in one chunk; the per-chunk iterator setup isn't free.
fn chunk_bounds(y: u64, sqrtx: u64, n: u64) -> Vec<(u64, u64)> {
    let width = ((sqrtx - y) / n).max(64);
    let mut bounds = Vec::new();
    let mut hi = sqrtx;
    while hi > y {
        let lo = y.max(hi.saturating_sub(width));
        bounds.push((lo, hi));
        hi = lo;
    }
    bounds
}

fn process_chunk(x: u128, lo: u64, hi: u64) -> ChunkResult {
    let l = (x / hi as u128) as u64;
    let u = (x / lo as u128) as u64;

    let mut p_iter = PrimeIter::from(hi.saturating_add(1), lo);
    let mut count_iter = PrimeIter::from(l + 1, u);
    let mut upcoming = count_iter.next();

    let mut p_count = 0u64;
    let mut rel_sum: i128 = 0;
    let mut rel = 0u64;

    while let Some(p) = p_iter.prev() {
        if p <= lo {
            break;
        }
        p_count += 1;
        let quotient = (x / p as u128) as u64;
        while let Some(q) = upcoming {
            if q > quotient {
                break;
            }
            rel += 1;
            upcoming = count_iter.next();
        }
        rel_sum += rel as i128;
    }

    // Finish counting up to ⌊x/lo⌋ so the next chunk's base is complete.
    while let Some(q) = upcoming {
        if q > u {
            break;
        }
        rel += 1;
        upcoming = count_iter.next();
    }

    ChunkResult {
        p_count,
        rel_sum,
        interval_count: rel,
    }
}

/// #primes in (lo, hi], by iteration; callers only use tiny ranges.
fn count_primes_in(lo: u64, hi: u64) -> u64 {
    let mut it = PrimeIter::from(lo + 1, hi);
    let mut count = 0;
    while let Some(p) = it.next() {
        if p > hi {
            break;
        }
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{generate_primes, pi_bsearch};

    /// Brute force from the definition over full prime tables.
    fn p2_reference(x: u64, y: u64) -> i128 {
        let sqrtx = isqrt(x as u128);
        let primes = generate_primes(x / y.max(1));
        let mut sum = 0i128;
        for (i, &p) in primes.iter().enumerate().skip(1) {
            if p <= y || p > sqrtx {
                continue;
            }
            let pi_xp = pi_bsearch(&primes, x / p) as i128;
            sum += pi_xp - (i as i128 - 1);
        }
        sum
    }

    fn check(x: u64, y: u64, threads: usize) {
        let primes = generate_primes(y);
        let pi_y = primes.len() as u64 - 1;
        assert_eq!(
            p2(x as u128, y, pi_y, threads),
            p2_reference(x, y),
            "x = {}, y = {}",
            x,
            y
        );
    }

    #[test]
    fn matches_definition_small() {
        check(100, 4, 1);
        check(1000, 10, 1);
        check(10_000, 21, 2);
        check(100_000, 46, 2);
        check(1_000_000, 100, 4);
    }

    #[test]
    fn empty_when_y_at_sqrt() {
        assert_eq!(p2(100, 10, 4, 2), 0);
        assert_eq!(p2(100, 50, 15, 2), 0);
    }

    #[test]
    fn thread_invariant() {
        let primes = generate_primes(31);
        let pi_y = primes.len() as u64 - 1;
        let one = p2(1_000_000, 31, pi_y, 1);
        for t in [2usize, 3, 8] {
            assert_eq!(p2(1_000_000, 31, pi_y, t), one);
        }
    }

    #[test]
    fn known_small_case() {
        // x = 100, y = 4: p in (4, 10]: 5 and 7.
        // p=5: pi(20) - pi(5) + 1 = 8 - 3 + 1 = 6
        // p=7: pi(14) - pi(7) + 1 = 6 - 4 + 1 = 3
        let primes = generate_primes(4);
        assert_eq!(p2(100, 4, primes.len() as u64 - 1, 1), 9);
    }
}
