//! # Imath — Exact Integer Roots and Fast Logarithms
//!
//! Integer arithmetic kernels shared by every algorithm in the crate:
//!
//! 1. **Exact k-th roots** (`isqrt`, `iroot`) over the full `u128` domain.
//!    A floating-point seed is refined by integer Newton steps and then
//!    corrected against checked integer exponentiation, so the result is
//!    exact even where `f64` has fewer mantissa bits than the input.
//! 2. **Fast logarithms** (`ilog`, `ilog2`), used only to size tables and
//!    pick tuning factors — never on a correctness path.
//!
//! The algorithm bounds all depend on these being exact: y = α·x^(1/3)
//! decides table sizes, √x bounds the semi-prime term, and x^(1/6) caps
//! the tuning factors.

/// Greatest r with r² ≤ x.
#[inline]
pub fn isqrt(x: u128) -> u64 {
    iroot::<2>(x)
}

/// Greatest r with r^K ≤ x, exact for K ∈ {2, 3, 4, 6} over all of `u128`.
///
/// The `f64` seed can be off by thousands of ULPs for 128-bit inputs, so
/// two integer Newton steps pull the estimate into range before the final
/// ±1 correction loop. Each correction step is verified by checked integer
/// exponentiation — overflow means "greater than x".
pub fn iroot<const K: u32>(x: u128) -> u64 {
    debug_assert!(K >= 2);
    if x == 0 {
        return 0;
    }

    let mut r = (x as f64).powf(1.0 / K as f64) as u128;
    r = r.max(1);

    // Newton: r <- ((K-1)*r + x / r^(K-1)) / K. Converges from above or
    // below; two steps suffice for any f64 seed error.
    for _ in 0..2 {
        match checked_pow(r, K - 1) {
            Some(rk) if rk > 0 => {
                r = ((K as u128 - 1) * r + x / rk) / K as u128;
                r = r.max(1);
            }
            _ => r = r / 2 + 1,
        }
    }

    while !pow_leq(r, K, x) {
        r -= 1;
    }
    while pow_leq(r + 1, K, x) {
        r += 1;
    }

    debug_assert!(pow_leq(r, K, x) && !pow_leq(r + 1, K, x));
    r as u64
}

/// r^k ≤ x, with overflow counting as "greater".
#[inline]
fn pow_leq(r: u128, k: u32, x: u128) -> bool {
    matches!(checked_pow(r, k), Some(p) if p <= x)
}

fn checked_pow(mut base: u128, mut exp: u32) -> Option<u128> {
    let mut acc: u128 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.checked_mul(base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base)?;
        }
    }
    Some(acc)
}

/// Floor of log2(x). x = 0 yields 0 so callers sizing tables never see a
/// negative dimension.
#[inline]
pub fn ilog2(x: u128) -> u32 {
    if x == 0 {
        0
    } else {
        127 - x.leading_zeros()
    }
}

/// Approximate floor of ln(x). Table sizing only.
#[inline]
pub fn ilog(x: u128) -> u32 {
    (ilog2(x) as f64 * std::f64::consts::LN_2) as u32
}

/// Smallest power of two ≥ x.
#[inline]
pub fn next_power_of_two(x: u64) -> u64 {
    x.max(1).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isqrt_small_values() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
    }

    #[test]
    fn iroot_exhaustive_small() {
        for n in 0u128..100_000 {
            let r2 = iroot::<2>(n) as u128;
            assert!(r2 * r2 <= n && (r2 + 1) * (r2 + 1) > n, "isqrt({})", n);
            let r3 = iroot::<3>(n) as u128;
            assert!(r3.pow(3) <= n && (r3 + 1).pow(3) > n, "iroot3({})", n);
            let r4 = iroot::<4>(n) as u128;
            assert!(r4.pow(4) <= n && (r4 + 1).pow(4) > n, "iroot4({})", n);
            let r6 = iroot::<6>(n) as u128;
            assert!(r6.pow(6) <= n && (r6 + 1).pow(6) > n, "iroot6({})", n);
        }
    }

    #[test]
    fn iroot_u64_max() {
        let x = u64::MAX as u128;
        assert_eq!(iroot::<2>(x), 4294967295);
        assert_eq!(iroot::<3>(x), 2642245);
        assert_eq!(iroot::<4>(x), 65535);
        assert_eq!(iroot::<6>(x), 1625);
    }

    #[test]
    fn iroot_u128_extremes() {
        assert_eq!(iroot::<2>(u128::MAX), u64::MAX);
        // (2^64 - 1)^2 = 2^128 - 2^65 + 1
        let x = (u64::MAX as u128) * (u64::MAX as u128);
        assert_eq!(iroot::<2>(x), u64::MAX);
        assert_eq!(iroot::<2>(x - 1), u64::MAX - 1);
    }

    #[test]
    fn iroot_around_perfect_powers() {
        for r in [2u128, 10, 1625, 2642245, 4294967295] {
            for k in [2u32, 3, 4, 6] {
                if let Some(p) = checked_pow(r, k) {
                    assert_eq!(iroot_dyn(k, p - 1), (r - 1) as u64);
                    assert_eq!(iroot_dyn(k, p), r as u64);
                    if let Some(p1) = p.checked_add(1) {
                        assert_eq!(iroot_dyn(k, p1), r as u64);
                    }
                }
            }
        }
    }

    fn iroot_dyn(k: u32, x: u128) -> u64 {
        match k {
            2 => iroot::<2>(x),
            3 => iroot::<3>(x),
            4 => iroot::<4>(x),
            6 => iroot::<6>(x),
            _ => unreachable!(),
        }
    }

    #[test]
    fn ilog2_matches_std() {
        for n in 1u128..10_000 {
            assert_eq!(ilog2(n), n.ilog2());
        }
        assert_eq!(ilog2(u128::MAX), 127);
        assert_eq!(ilog2(0), 0);
    }

    #[test]
    fn next_power_of_two_rounds_up() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(1024), 1024);
        assert_eq!(next_power_of_two(1025), 2048);
    }
}
