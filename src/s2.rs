//! # S2 — Segmented Evaluation of the Hard Special Leaves
//!
//! The dominant cost of the LMO and Gourdon algorithms is the sieve-driven
//! sum over special leaves n = primes[b]·m:
//!
//!   S₂ = Σ_b Σ_m −μ(m) · φ(⌊x / (primes[b]·m)⌋, b−1)
//!
//! with m squarefree, y/primes[b] < m ≤ y and primes[b] < lpf(m). Each φ
//! value is answered by a survivor count against a [`SegmentSieve`] that
//! has the first b−1 primes crossed out, so within one traversal the
//! leaves for a given b must be visited with non-decreasing φ-arguments —
//! m walks downward, the argument walks upward, and one cross-out pass
//! per b keeps the sieve in step.
//!
//! ## Parallel decomposition
//!
//! The traversal of [0, x/y + 1) is split into regions of
//! `segments_per_thread × segment_size`. A relaxed atomic counter hands
//! out region indices; workers claim regions until the round is empty and
//! never otherwise communicate. A region is self-contained: it reports
//! its leaf sum computed against region-local φ bases, plus per-b leaf
//! multiplicities (Σ −μ) and per-b survivor counts. The main thread then
//! replays regions in index order, adding `phi[b] · mu_sum[b]` for the
//! survivors that earlier regions contributed, which reconstructs the
//! global φ bases exactly. Integer addition in a fixed order makes the
//! total bit-identical for every thread count.
//!
//! Per round the workers' wall-clock timings feed the [`LoadBalancer`],
//! which retunes the segment geometry before the next round begins.

use crate::balance::LoadBalancer;
use crate::imath::{isqrt, next_power_of_two};
use crate::sieve::SegmentSieve;
use crate::status::Status;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Smallest segment the balancer may select.
const MIN_SEGMENT_SIZE: u64 = 1 << 6;

/// What one region reports back for the ordered reduction.
struct RegionResult {
    index: u64,
    /// Leaf contributions evaluated against region-local φ bases.
    leaf_sum: i128,
    /// Σ −μ(m) of the leaves consumed per b.
    mu_sum: Vec<i64>,
    /// Survivors per b inside this region (at sieve level b−1).
    phi_count: Vec<u64>,
}

/// Sum of the hard special leaves over [0, x/y + 1).
///
/// `easy_bounds`, when given, holds per-b thresholds: leaves whose
/// φ-argument is ≤ `easy_bounds[b]` are someone else's responsibility
/// (Gourdon's AC term) and are excluded here. `None` evaluates every
/// special leaf (LMO).
pub fn hard_leaves(
    x: u128,
    y: u64,
    c: u64,
    primes: &[u64],
    lpf: &[u32],
    mu: &[i32],
    easy_bounds: Option<&[u64]>,
    threads: usize,
) -> i128 {
    let pi_y = primes.len() as u64 - 1;
    if pi_y < 2 || c + 1 >= pi_y {
        return 0;
    }
    debug_assert!(y <= u32::MAX as u64, "factor tables are u32-indexed");
    let limit = (x / y as u128) as u64 + 1;
    let threads = threads.max(1);

    let max_segment_size =
        next_power_of_two((limit / (threads as u64 * 4)).clamp(MIN_SEGMENT_SIZE, 1 << 24));
    let initial = next_power_of_two(isqrt(limit as u128));
    let mut balancer = LoadBalancer::new(MIN_SEGMENT_SIZE, max_segment_size, initial);

    let status = Status::new();
    let mut total: i128 = 0;
    let mut phi_global = vec![0u64; pi_y as usize + 1];
    let mut low = 0u64;

    while low < limit {
        let span = balancer.segment_size * balancer.segments_per_thread;
        let round_end = limit.min(low.saturating_add(span.saturating_mul(threads as u64)));
        let regions = (round_end - low).div_ceil(span);
        let counter = AtomicU64::new(0);
        let segment_size = balancer.segment_size;

        let mut worker_out: Vec<(f64, Vec<RegionResult>)> = (0..threads)
            .into_par_iter()
            .map(|_| {
                let start = Instant::now();
                let mut results = Vec::new();
                let mut sieve = SegmentSieve::new(segment_size);
                loop {
                    let r = counter.fetch_add(1, Ordering::Relaxed);
                    if r >= regions {
                        break;
                    }
                    let region_low = low + r * span;
                    let region_high = round_end.min(region_low + span);
                    results.push(process_region(
                        x,
                        y,
                        c,
                        primes,
                        lpf,
                        mu,
                        easy_bounds,
                        &mut sieve,
                        r,
                        region_low,
                        region_high,
                        segment_size,
                    ));
                }
                (start.elapsed().as_secs_f64(), results)
            })
            .collect();

        let timings: Vec<f64> = worker_out.iter().map(|(t, _)| *t).collect();
        let mut round: Vec<RegionResult> = worker_out
            .drain(..)
            .flat_map(|(_, results)| results)
            .collect();
        round.sort_unstable_by_key(|r| r.index);

        // Replay regions in traversal order: each region's leaves sit on
        // top of the survivors all earlier regions contributed per b.
        for region in &round {
            total += region.leaf_sum;
            for b in (c + 1) as usize..pi_y as usize {
                total += phi_global[b] as i128 * region.mu_sum[b] as i128;
                phi_global[b] += region.phi_count[b];
            }
        }

        low = round_end;
        balancer.adjust(&timings);
        status.print(low, limit);
    }

    status.finish();
    total
}

/// Evaluate one region [region_low, region_high) segment by segment.
#[allow(clippy::too_many_arguments)]
fn process_region(
    x: u128,
    y: u64,
    c: u64,
    primes: &[u64],
    lpf: &[u32],
    mu: &[i32],
    easy_bounds: Option<&[u64]>,
    sieve: &mut SegmentSieve,
    index: u64,
    region_low: u64,
    region_high: u64,
    segment_size: u64,
) -> RegionResult {
    let pi_y = primes.len() as u64 - 1;
    let n = pi_y as usize + 1;

    // First multiple of each sieving prime at or beyond the region.
    let mut next_multiple = vec![0u64; n];
    for b in 1..pi_y as usize {
        let p = primes[b];
        next_multiple[b] = region_low
            .checked_next_multiple_of(p)
            .unwrap_or(u64::MAX)
            .max(p);
    }

    // Highest m whose leaf falls at or beyond this region, per b: the m
    // walk is monotone downward, so this pointer only ever decreases.
    let mut m_next = vec![0u64; n];
    for b in (c + 1) as usize..pi_y as usize {
        let p = primes[b];
        let mut m = y.min((x / (p as u128 * region_low.max(1) as u128)) as u64);
        if let Some(bounds) = easy_bounds {
            // Leaves with argument ≤ bounds[b] are easy; the largest hard
            // m satisfies primes[b]·m·(bound+1) ≤ x.
            m = m.min((x / (p as u128 * (bounds[b] as u128 + 1))) as u64);
        }
        m_next[b] = m;
    }

    let mut leaf_sum: i128 = 0;
    let mut mu_sum = vec![0i64; n];
    let mut phi_count = vec![0u64; n];

    let mut seg_low = region_low;
    while seg_low < region_high {
        let seg_high = region_high.min(seg_low + segment_size);
        sieve.init(seg_low, seg_high, primes, c, &mut next_multiple);

        for b in (c + 1) as usize..pi_y as usize {
            let prime = primes[b];
            let min_m = y / prime;
            let mut m = m_next[b];

            while m > min_m {
                let arg = (x / (prime as u128 * m as u128)) as u64;
                if arg >= seg_high {
                    break;
                }
                debug_assert!(arg >= seg_low);
                if mu[m as usize] != 0 && prime < lpf[m as usize] as u64 {
                    let phi_b = phi_count[b] + sieve.count(arg - seg_low);
                    let weight = -mu[m as usize] as i64;
                    leaf_sum += weight as i128 * phi_b as i128;
                    mu_sum[b] += weight;
                }
                m -= 1;
            }
            m_next[b] = m;

            phi_count[b] += sieve.count_all();
            sieve.cross_out(prime, &mut next_multiple[b]);
        }

        seg_low = seg_high;
    }

    RegionResult {
        index,
        leaf_sum,
        mu_sum,
        phi_count,
    }
}
