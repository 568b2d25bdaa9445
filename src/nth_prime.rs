//! # NthPrime — Exact n-th Prime via an Analytic Jump
//!
//! Li⁻¹(n) lands within a whisker of p_n, so the exact answer is one
//! π(guess) evaluation plus a short prime-iterator walk to close the gap
//! — the counting does the heavy lifting, the iterator the last mile.

use crate::iterator::PrimeIter;
use crate::li::li_inverse;
use crate::Error;

/// π(2⁶⁴ − 1): the largest n for which p_n still fits in u64.
const MAX_N: u64 = 425_656_284_035_217_743;

/// The n-th prime, 1-indexed: nth_prime(1) = 2.
pub fn nth_prime(n: u64) -> Result<u64, Error> {
    if n == 0 {
        return Err(Error::InvalidArgument(
            "the n-th prime is 1-indexed; n must be ≥ 1".into(),
        ));
    }
    if n > MAX_N {
        return Err(Error::Overflow);
    }

    // Short walks skip the counting machinery entirely.
    if n <= 100 {
        let mut it = PrimeIter::new();
        for _ in 0..n - 1 {
            it.next();
        }
        return it.next().ok_or(Error::Overflow);
    }

    let guess = li_inverse(n as u128) as u64;
    let count = crate::pi(guess);
    let mut it = PrimeIter::from(guess.saturating_add(1), 0);

    if count >= n {
        // The guess overshot: walk down from the count-th prime.
        let mut c = count;
        loop {
            let p = it.prev().ok_or(Error::Overflow)?;
            if c == n {
                return Ok(p);
            }
            c -= 1;
        }
    } else {
        let mut c = count;
        loop {
            let p = it.next().ok_or(Error::Overflow)?;
            c += 1;
            if c == n {
                return Ok(p);
            }
        }
    }
}
