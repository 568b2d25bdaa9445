//! # Primecount — Core Library
//!
//! Combinatorial prime counting: π(x) in sub-linear time and memory for x
//! up to ~10²⁷. Exposes the classical algorithm family, from Legendre's
//! identity through Meissel and Lehmer to Lagarias–Miller–Odlyzko and the
//! Gourdon-style easy/hard leaf split that is the default for every x.
//!
//! ## Module Organization
//!
//! **Algorithm modules** (each assembles π(x) from the shared terms):
//! - [`lmo`] — LMO: π(x) = S₁ + S₂ + π(y) − 1 − P₂, segmented parallel S₂
//! - [`gourdon`] — easy/hard leaf split with π-table AC term (default)
//! - [`phi`] — general φ(x, a) plus the Legendre / Meissel / Lehmer family
//!
//! **Engine modules** (the terms and the machinery under them):
//! - [`s1`] — ordinary leaves (Möbius-weighted tabulated φ)
//! - [`s2`] — segmented, load-balanced hard special leaves
//! - [`p2`] — semi-prime correction term
//! - [`sieve`] — the Fenwick-augmented segment sieve
//! - [`balance`] — RSD-driven segment geometry tuning
//! - [`tuning`] — α / α_y / α_z selection and overrides
//!
//! **Infrastructure modules**:
//! - [`imath`] — exact integer roots, fast logarithms
//! - [`generate`] — primes / least-prime-factor / Möbius tables
//! - [`phi_tiny`] — tabulated φ(x, a) for a ≤ 6
//! - [`pi_table`] — O(1) π lookup bitmap
//! - [`iterator`] — bidirectional segmented prime iterator
//! - [`li`], [`nth_prime`] — analytic helpers and the n-th prime
//! - [`expr`] — integer expression parser for CLI arguments
//! - [`status`] — rate-limited progress printing
//!
//! ## Design Philosophy
//!
//! All counting paths share one pipeline: **tables → ordinary leaves →
//! sieved hard leaves → semi-prime correction**. Everything deterministic:
//! integer-only reductions in fixed order make π(x) bit-identical across
//! thread counts. Tuning factors (α, α_y, α_z) move work between terms
//! but can never change a result.

pub mod balance;
pub mod expr;
pub mod generate;
pub mod gourdon;
pub mod imath;
pub mod iterator;
pub mod li;
pub mod lmo;
pub mod nth_prime;
pub mod p2;
pub mod phi;
pub mod phi_tiny;
pub mod pi_table;
pub mod s1;
pub mod s2;
pub mod sieve;
pub mod status;
pub mod tuning;

use thiserror::Error as ThisError;

pub use gourdon::{pi_gourdon_128, pi_gourdon_64, MAX_X};
pub use li::{li, li_inverse};
pub use lmo::{pi_lmo, pi_lmo_simple};
pub use nth_prime::nth_prime;
pub use phi::{phi, pi_legendre, pi_lehmer, pi_meissel};
pub use tuning::{clear_alphas, set_alpha, set_alpha_y, set_alpha_z};

/// Errors surfaced by the library entry points. Always distinct from any
/// legitimate π(x) value.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The input is outside an operation's domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The result (or an internal bound) would exceed the supported range.
    #[error("result exceeds the supported range")]
    Overflow,
}

/// π(x) with the default algorithm and the process thread pool.
pub fn pi(x: u64) -> u64 {
    gourdon::pi_gourdon_64(x, get_num_threads())
}

/// π(x) for 128-bit x. Errors with [`Error::Overflow`] past [`MAX_X`].
pub fn pi128(x: u128) -> Result<u128, Error> {
    gourdon::pi_gourdon_128(x, get_num_threads())
}

/// π(x) by direct sieving — linear work, the ground truth the sub-linear
/// algorithms are tested against.
pub fn pi_cache(x: u64) -> u64 {
    // Past the table-friendly range, stream the primes instead of holding
    // the bitmap.
    const TABLE_LIMIT: u64 = 100_000_000;
    if x < 2 {
        return 0;
    }
    if x <= TABLE_LIMIT {
        return pi_table::PiTable::new(x).pi(x);
    }
    pi_primesieve(x)
}

/// π(x) by enumerating primes with the segmented iterator.
pub fn pi_primesieve(x: u64) -> u64 {
    let mut it = iterator::PrimeIter::from(2, x);
    let mut count = 0;
    while let Some(p) = it.next() {
        if p > x {
            break;
        }
        count += 1;
    }
    count
}

/// Worker count used by the parallel evaluators: the process-wide rayon
/// pool, which defaults to the hardware concurrency.
pub fn get_num_threads() -> usize {
    rayon::current_num_threads()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pi_cache_known_values() {
        assert_eq!(pi_cache(0), 0);
        assert_eq!(pi_cache(1), 0);
        assert_eq!(pi_cache(2), 1);
        assert_eq!(pi_cache(10), 4);
        assert_eq!(pi_cache(100), 25);
        assert_eq!(pi_cache(1000), 168);
        assert_eq!(pi_cache(1_000_000), 78498);
    }

    #[test]
    fn pi_primesieve_agrees_with_cache() {
        for x in [0u64, 1, 2, 10, 1000, 99_991, 1_000_000] {
            assert_eq!(pi_primesieve(x), pi_cache(x), "x = {}", x);
        }
    }

    #[test]
    fn pi_dispatch_matches_cache() {
        for x in [0u64, 10, 5000, 1_000_000] {
            assert_eq!(pi(x), pi_cache(x), "x = {}", x);
        }
    }

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidArgument("x must be positive".into());
        assert!(e.to_string().contains("invalid argument"));
        assert_eq!(Error::Overflow.to_string(), "result exceeds the supported range");
    }
}
