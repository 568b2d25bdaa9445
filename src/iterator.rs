//! # Iterator — Bidirectional Segmented Prime Iterator
//!
//! A value type owning a base-primes buffer and a sliding sieve window.
//! `next()` and `prev()` stream primes in either direction without ever
//! materializing the full range; `jump_to` repositions the logical cursor
//! while retaining the base-primes buffer when it is small enough to be
//! worth keeping (≤ 200 KB — a checked bound, not a comment).
//!
//! Consumers: the semi-prime term walks p downward while counting π
//! upward, and `nth_prime` walks forward from an analytic starting guess.
//! Single-owner discipline throughout; moving the iterator moves its
//! buffers.

use crate::imath::isqrt;

/// Width of one sieve window.
const SEGMENT: u64 = 1 << 18;

/// Window width once iteration has passed the stop hint.
const MIN_WINDOW: u64 = 1 << 12;

/// Retain the base-primes buffer across `jump_to` only below this size.
const PRESIEVE_RETAIN_BYTES: usize = 200_000;

pub struct PrimeIter {
    /// Sieving primes ≤ √(window high), grown on demand.
    base_primes: Vec<u64>,
    /// Limit the base primes were last sieved to.
    base_limit: u64,
    /// Primes inside the current window, ascending.
    window: Vec<u64>,
    window_low: u64,
    window_high: u64,
    /// Last prime handed out, if any.
    last: Option<u64>,
    start: u64,
    stop_hint: u64,
}

impl PrimeIter {
    pub fn new() -> Self {
        Self::from(0, u64::MAX)
    }

    /// Iterator positioned so the first `next()` yields the smallest prime
    /// ≥ start and the first `prev()` yields the largest prime < start.
    /// `stop_hint` bounds how far base primes are pre-grown; iteration
    /// past it stays correct, just less efficient.
    pub fn from(start: u64, stop_hint: u64) -> Self {
        PrimeIter {
            base_primes: Vec::new(),
            base_limit: 0,
            window: Vec::new(),
            window_low: 0,
            window_high: 0,
            last: None,
            start,
            stop_hint,
        }
    }

    /// Reset the logical position, keeping presieve state under the
    /// retention cap.
    pub fn jump_to(&mut self, start: u64, stop_hint: u64) {
        self.start = start;
        self.stop_hint = stop_hint;
        self.last = None;
        self.window.clear();
        self.window_low = 0;
        self.window_high = 0;
        if self.base_primes.len() * std::mem::size_of::<u64>() > PRESIEVE_RETAIN_BYTES {
            self.base_primes = Vec::new();
            self.base_limit = 0;
        }
    }

    /// Smallest prime greater than the last one returned (≥ start on the
    /// first call). None once the next prime would exceed u64.
    pub fn next(&mut self) -> Option<u64> {
        let lower = match self.last {
            Some(p) => p.checked_add(1)?,
            None => self.start,
        };
        let p = self.find_next(lower)?;
        self.last = Some(p);
        Some(p)
    }

    /// Largest prime smaller than the last one returned (< start on the
    /// first call). None below 2.
    pub fn prev(&mut self) -> Option<u64> {
        let upper = match self.last {
            Some(p) => p.checked_sub(1)?,
            None => self.start.checked_sub(1)?,
        };
        let p = self.find_prev(upper)?;
        self.last = Some(p);
        Some(p)
    }

    fn find_next(&mut self, lower: u64) -> Option<u64> {
        if lower < self.window_high && lower >= self.window_low {
            let i = self.window.partition_point(|&q| q < lower);
            if i < self.window.len() {
                return Some(self.window[i]);
            }
        }
        let mut lo = lower;
        loop {
            if lo == u64::MAX {
                return None;
            }
            let mut hi = lo.checked_add(SEGMENT).unwrap_or(u64::MAX);
            if self.stop_hint != u64::MAX {
                // Iteration usually ends at the hint; don't sieve far past
                // it on the off chance the caller keeps going.
                let capped = self
                    .stop_hint
                    .saturating_add(1)
                    .max(lo.saturating_add(MIN_WINDOW));
                hi = hi.min(capped).max(lo + 1);
            }
            self.fill_window(lo, hi);
            if let Some(&p) = self.window.first() {
                return Some(p);
            }
            if hi == u64::MAX {
                return None;
            }
            lo = hi;
        }
    }

    fn find_prev(&mut self, upper: u64) -> Option<u64> {
        if upper < 2 {
            return None;
        }
        if upper >= self.window_low && upper < self.window_high {
            let i = self.window.partition_point(|&q| q <= upper);
            if i > 0 {
                return Some(self.window[i - 1]);
            }
        }
        let mut hi = upper.checked_add(1).unwrap_or(u64::MAX);
        loop {
            let lo = hi.saturating_sub(SEGMENT);
            self.fill_window(lo, hi);
            if let Some(&p) = self.window.last() {
                return Some(p);
            }
            if lo == 0 {
                return None;
            }
            hi = lo;
        }
    }

    /// Sieve [lo, hi) into the window.
    fn fill_window(&mut self, lo: u64, hi: u64) {
        debug_assert!(hi > lo);
        // A finite stop hint sizes the base primes once instead of
        // regrowing them window by window.
        let mut base_limit = isqrt((hi - 1) as u128);
        if self.stop_hint != u64::MAX && self.stop_hint > hi {
            base_limit = base_limit.max(isqrt(self.stop_hint as u128));
        }
        self.grow_base_primes(base_limit);

        let len = (hi - lo) as usize;
        let mut flags = vec![true; len];
        for k in 0..2u64.saturating_sub(lo).min(hi - lo) {
            flags[k as usize] = false; // 0 and 1
        }
        for &p in &self.base_primes {
            // Base primes may be pre-grown past this window's needs.
            if p.saturating_mul(p) >= hi {
                break;
            }
            // Smallest multiple of p in [lo, hi) that is not p itself.
            let mut m = match lo.checked_next_multiple_of(p) {
                Some(m0) => m0.max(p * 2),
                None => continue,
            };
            while m < hi {
                flags[(m - lo) as usize] = false;
                match m.checked_add(p) {
                    Some(next) => m = next,
                    None => break,
                }
            }
        }

        self.window.clear();
        for (k, &f) in flags.iter().enumerate() {
            if f {
                self.window.push(lo + k as u64);
            }
        }
        self.window_low = lo;
        self.window_high = hi;
    }

    fn grow_base_primes(&mut self, limit: u64) {
        if self.base_limit >= limit {
            return;
        }
        let table = crate::generate::generate_primes(limit);
        self.base_primes = table[1..].to_vec();
        self.base_limit = limit;
    }
}

impl Default for PrimeIter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_from_zero_yields_primes_in_order() {
        let mut it = PrimeIter::new();
        let first: Vec<u64> = (0..10).map(|_| it.next().unwrap()).collect();
        assert_eq!(first, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn next_from_start_is_inclusive() {
        let mut it = PrimeIter::from(7, 100);
        assert_eq!(it.next(), Some(7));
        let mut it = PrimeIter::from(8, 100);
        assert_eq!(it.next(), Some(11));
    }

    #[test]
    fn prev_from_start_is_exclusive() {
        let mut it = PrimeIter::from(7, 0);
        assert_eq!(it.prev(), Some(5));
        let mut it = PrimeIter::from(8, 0);
        assert_eq!(it.prev(), Some(7));
    }

    #[test]
    fn prev_descends_to_none() {
        let mut it = PrimeIter::from(10, 0);
        assert_eq!(it.prev(), Some(7));
        assert_eq!(it.prev(), Some(5));
        assert_eq!(it.prev(), Some(3));
        assert_eq!(it.prev(), Some(2));
        assert_eq!(it.prev(), None);
    }

    #[test]
    fn next_and_prev_interleave() {
        let mut it = PrimeIter::from(10, 100);
        assert_eq!(it.next(), Some(11));
        assert_eq!(it.next(), Some(13));
        assert_eq!(it.prev(), Some(11));
        assert_eq!(it.next(), Some(13));
    }

    #[test]
    fn jump_to_repositions() {
        let mut it = PrimeIter::new();
        assert_eq!(it.next(), Some(2));
        it.jump_to(1000, 2000);
        assert_eq!(it.next(), Some(1009));
        it.jump_to(0, 100);
        assert_eq!(it.next(), Some(2));
    }

    #[test]
    fn crosses_window_boundaries() {
        // Walk over several window fills and compare to a sieve.
        let limit = (SEGMENT * 2 + 1000) as usize;
        let table = crate::generate::generate_primes(limit as u64);
        let mut it = PrimeIter::from(0, limit as u64);
        for &p in &table[1..] {
            assert_eq!(it.next(), Some(p));
        }
    }

    #[test]
    fn count_primes_in_range() {
        let mut it = PrimeIter::from(1_000_000, 1_100_000);
        let mut count = 0;
        while let Some(p) = it.next() {
            if p > 1_100_000 {
                break;
            }
            count += 1;
        }
        assert_eq!(count, 7216); // pi(1.1e6) - pi(1e6)
    }
}
