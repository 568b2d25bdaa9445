//! # Gourdon — Prime Counting with an Easy/Hard Leaf Split
//!
//! The same special-leaf sum LMO sieves in full is split here by a second
//! tuning bound z = α_z·y. A leaf with φ-argument n = ⌊x/(primes[b]·m)⌋
//! is **easy** when n ≤ z and n < primes[b]²: below that square every
//! surviving composite would exceed n, so
//!
//!   φ(n, b−1) = 1 + max(0, π(n) − (b−1))
//!
//! and the leaf costs one π-table lookup instead of a sieve count. The
//! remaining **hard** leaves (the D term) go through the segmented
//! Fenwick engine with exactly the complementary predicate, so the two
//! terms partition the sum for every α_y, α_z — the tuning factors move
//! work between AC and D, never the result.
//!
//! Assembly: π(x) = Σ₀ + AC + D + π(y) − 1 − B, with Σ₀ the ordinary
//! leaves and B the semi-prime term over (y, √x].
//!
//! The AC scan parallelizes over b: a relaxed atomic counter deals out
//! b-values to the workers, and the per-b sums add up identically in any
//! order.

use crate::generate::{generate_lpf, generate_moebius, generate_primes};
use crate::imath::iroot;
use crate::phi_tiny;
use crate::pi_table::PiTable;
use crate::s1::ordinary_leaves;
use crate::tuning;
use crate::Error;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Largest x accepted by the 128-bit entry point. Beyond this the factor
/// tables would outgrow their u32 indexing.
pub const MAX_X: u128 = 10u128.pow(27);

/// π(x) by Gourdon's decomposition, 64-bit x.
pub fn pi_gourdon_64(x: u64, threads: usize) -> u64 {
    pi_gourdon(x as u128, threads) as u64
}

/// π(x) by Gourdon's decomposition, 128-bit x.
pub fn pi_gourdon_128(x: u128, threads: usize) -> Result<u128, Error> {
    if x > MAX_X {
        return Err(Error::Overflow);
    }
    Ok(pi_gourdon(x, threads) as u128)
}

fn gourdon_bounds(x: u128) -> (u64, u64) {
    let x13 = iroot::<3>(x);
    let y = ((x13 as f64 * tuning::alpha_y(x)) as u64)
        .max(x13)
        .max(1)
        .min(u32::MAX as u64);
    let z_cap = ((x / y as u128) as u64).min(y.saturating_mul(64));
    let z = ((y as f64 * tuning::alpha_z(x)) as u64).clamp(y, z_cap.max(y));
    (y, z)
}

pub(crate) fn pi_gourdon(x: u128, threads: usize) -> i128 {
    if x < 2 {
        return 0;
    }
    let (y, z) = gourdon_bounds(x);
    let primes = generate_primes(y);
    let pi_y = primes.len() as u64 - 1;
    let c = pi_y.min(phi_tiny::MAX_A);
    let lpf = generate_lpf(y);
    let mu = generate_moebius(y);

    // Per-b easy threshold: a leaf argument at or below it is answerable
    // from the π-table.
    let easy_bounds: Vec<u64> = primes
        .iter()
        .map(|&p| z.min((p * p).saturating_sub(1)))
        .collect();

    let sigma0 = ordinary_leaves(x, y, c, &primes);
    let ac = ac_term(x, y, c, z, &primes, &lpf, &mu, &easy_bounds, threads);
    let d = crate::s2::hard_leaves(x, y, c, &primes, &lpf, &mu, Some(&easy_bounds), threads);
    let b = crate::p2::p2(x, y, pi_y, threads);

    debug!(y, z, c, %sigma0, %ac, %d, %b, threads, "gourdon terms");
    sigma0 + ac + d + pi_y as i128 - 1 - b
}

/// The A + C easy leaves: π-table lookups, no sieve.
#[allow(clippy::too_many_arguments)]
fn ac_term(
    x: u128,
    y: u64,
    c: u64,
    z: u64,
    primes: &[u64],
    lpf: &[u32],
    mu: &[i32],
    easy_bounds: &[u64],
    threads: usize,
) -> i128 {
    let pi_y = primes.len() as u64 - 1;
    if pi_y < 2 || c + 1 >= pi_y {
        return 0;
    }
    let pi_tbl = PiTable::new(z);
    let next_b = AtomicU64::new(c + 1);

    (0..threads.max(1))
        .into_par_iter()
        .map(|_| {
            let mut sum = 0i128;
            loop {
                let b = next_b.fetch_add(1, Ordering::Relaxed);
                if b >= pi_y {
                    break;
                }
                sum += ac_leaves_for(x, y, primes[b as usize], b, lpf, mu, easy_bounds, &pi_tbl);
            }
            sum
        })
        .sum()
}

/// Easy leaves of one b: m descending over the range whose arguments
/// stay at or below the easy threshold.
#[allow(clippy::too_many_arguments)]
fn ac_leaves_for(
    x: u128,
    y: u64,
    prime: u64,
    b: u64,
    lpf: &[u32],
    mu: &[i32],
    easy_bounds: &[u64],
    pi_tbl: &PiTable,
) -> i128 {
    let bound = easy_bounds[b as usize];
    // arg ≤ bound ⟺ m ≥ m_min: primes[b]·m·(bound+1) > x.
    let m_min = ((x / (prime as u128 * (bound as u128 + 1))) as u64 + 1).max(y / prime + 1);
    let mut sum = 0i128;

    for m in m_min..=y {
        if mu[m as usize] != 0 && prime < lpf[m as usize] as u64 {
            let arg = (x / (prime as u128 * m as u128)) as u64;
            debug_assert!(arg <= bound);
            let phi = 1 + pi_tbl.pi(arg).saturating_sub(b - 1);
            sum -= mu[m as usize] as i128 * phi as i128;
        }
    }
    sum
}
