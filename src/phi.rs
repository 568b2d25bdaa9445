//! # Phi — The General Partial Sieve Function
//!
//! φ(x, a) counts the integers ≤ x with no prime factor among the first a
//! primes. The classic recurrence
//!
//!   φ(x, a) = φ(x, a−1) − φ(x/pₐ, a−1)
//!
//! bottoms out in [`phi_tiny`] for a ≤ 6 and is cut short whenever
//! pₐ² > x: past that point every surviving composite would exceed x, so
//! the survivors are exactly 1 and the primes in (pₐ, x], i.e.
//! φ = 1 + max(0, π(x) − a), answered from a [`PiTable`]. A small memo
//! cache catches the repeated subproblems the recurrence generates.
//!
//! This is the workhorse behind the Legendre / Meissel / Lehmer family;
//! LMO and Gourdon only ever need the tabulated φ and the sieve counts.

use crate::generate::{generate_primes, pi_bsearch};
use crate::imath::isqrt;
use crate::phi_tiny::{self, phi_tiny};
use crate::pi_table::PiTable;
use std::collections::HashMap;

/// φ(x, a) with tables sized by the caller: `primes` must hold at least a
/// primes and `pi_tbl` should cover isqrt(x) for the cutoff to engage.
pub(crate) fn phi_with_tables(x: u128, a: u64, primes: &[u64], pi_tbl: &PiTable) -> u128 {
    let mut cache = HashMap::new();
    phi_recurse(x, a, primes, pi_tbl, &mut cache)
}

fn phi_recurse(
    x: u128,
    a: u64,
    primes: &[u64],
    pi_tbl: &PiTable,
    cache: &mut HashMap<(u128, u64), u128>,
) -> u128 {
    if x == 0 {
        return 0;
    }
    if phi_tiny::is_tiny(a) {
        return phi_tiny(x, a);
    }
    debug_assert!((a as usize) < primes.len());
    let p_a = primes[a as usize];

    if x <= pi_tbl.limit() as u128 && (p_a as u128) * (p_a as u128) > x {
        // Only 1 and the primes in (p_a, x] survive.
        let pi_x = pi_tbl.pi(x as u64);
        return 1 + pi_x.saturating_sub(a) as u128;
    }

    if let Some(&v) = cache.get(&(x, a)) {
        return v;
    }
    let v = phi_recurse(x, a - 1, primes, pi_tbl, cache)
        - phi_recurse(x / p_a as u128, a - 1, primes, pi_tbl, cache);
    cache.insert((x, a), v);
    v
}

/// φ(x, a) for arbitrary a.
///
/// For a beyond π(√x) the survivors reduce to 1 plus the primes in
/// (pₐ, x], which costs a π(x) evaluation instead of a recursion.
///
/// # Panics
/// Panics if that π(x) evaluation would need x beyond [`crate::MAX_X`].
pub fn phi(x: u128, a: u64) -> u128 {
    if x == 0 {
        return 0;
    }
    if phi_tiny::is_tiny(a) {
        return phi_tiny(x, a);
    }

    let sqrtx = isqrt(x);
    let pi_tbl = PiTable::new(sqrtx.max(2));
    let pi_sqrtx = pi_tbl.pi(sqrtx);

    if a >= pi_sqrtx {
        // Every composite ≤ x has a factor ≤ √x ≤ p_a.
        let pi_x = crate::pi128(x).expect("x within supported domain");
        return 1 + (pi_x as u128).saturating_sub(a as u128);
    }

    let primes = generate_primes(sqrtx);
    phi_with_tables(x, a, &primes, &pi_tbl)
}

/// π(x) via Legendre's identity: π(x) = φ(x, a) + a − 1, a = π(√x).
pub fn pi_legendre(x: u64) -> u64 {
    if x < 2 {
        return 0;
    }
    let sqrtx = isqrt(x as u128);
    let primes = generate_primes(sqrtx);
    let a = primes.len() as u64 - 1;
    let pi_tbl = PiTable::new(sqrtx.max(2));
    let phi = phi_with_tables(x as u128, a, &primes, &pi_tbl);
    phi as u64 + a - 1
}

/// π(x) via Meissel: a drops to π(∛x) at the cost of the P₂ term.
pub fn pi_meissel(x: u64, threads: usize) -> u64 {
    if x < 2 {
        return 0;
    }
    let y = crate::imath::iroot::<3>(x as u128);
    let sqrtx = isqrt(x as u128);
    let pi_tbl = PiTable::new(sqrtx.max(2));
    let all_primes = generate_primes(sqrtx);
    let a = pi_bsearch(&all_primes, y);
    let phi = phi_with_tables(x as u128, a, &all_primes, &pi_tbl) as i128;
    let p2 = crate::p2::p2(x as u128, y, a, threads);
    (phi + a as i128 - 1 - p2) as u64
}

/// π(x) via Lehmer: a = π(x^(1/4)), paying both P₂ and P₃.
pub fn pi_lehmer(x: u64, threads: usize) -> u64 {
    if x < 2 {
        return 0;
    }
    let y = crate::imath::iroot::<4>(x as u128);
    let sqrtx = isqrt(x as u128);
    let all_primes = generate_primes(sqrtx);
    let a = pi_bsearch(&all_primes, y);
    let pi_tbl = PiTable::new(sqrtx.max(2));

    let phi = phi_with_tables(x as u128, a, &all_primes, &pi_tbl) as i128;
    let p2 = crate::p2::p2(x as u128, y, a, threads);
    let p3 = p3(x as u128, a, &all_primes, &pi_tbl);
    (phi + a as i128 - 1 - p2 - p3) as u64
}

/// Lehmer's third-order term: pairs of primes p_i ≤ p_j in (x^(1/4), ∛x]
/// whose product still leaves room for a third prime factor.
///
///   P₃ = Σ_i Σ_j ( π(x / (p_i·p_j)) − j + 1 )
fn p3(x: u128, a: u64, primes: &[u64], pi_tbl: &PiTable) -> i128 {
    let x13 = crate::imath::iroot::<3>(x);
    let pi_x13 = pi_bsearch(primes, x13);
    let mut sum = 0i128;

    for i in (a + 1)..=pi_x13 {
        let p_i = primes[i as usize];
        let bound = isqrt(x / p_i as u128);
        let pi_bound = pi_bsearch(primes, bound);
        for j in i..=pi_bound {
            let p_j = primes[j as usize];
            let quotient = (x / (p_i as u128 * p_j as u128)) as u64;
            debug_assert!(quotient <= pi_tbl.limit());
            sum += pi_tbl.pi(quotient) as i128 - j as i128 + 1;
        }
    }
    sum
}
