//! # Tuning — α, α_y, α_z Selection
//!
//! The tuning factors decide how far above x^(1/3) the sieving bound y
//! (and Gourdon's easy-leaf bound z) sit. They trade the cost of the
//! sieved hard sum against the cost of the table-driven easy work, so the
//! right value grows slowly with x; the defaults interpolate against
//! log₁₀(x) inside an envelope calibrated per algorithm.
//!
//! Tuning factors change performance, never results: every consumer
//! clamps the derived bounds back into its provable range, so any
//! override in [1, x^(1/6)] yields the same π(x). The overrides are the
//! only process-wide mutable state in the crate, each behind a single
//! atomic slot (f64 bits, 0 = unset).

use crate::imath::iroot;
use std::sync::atomic::{AtomicU64, Ordering};

static ALPHA: AtomicU64 = AtomicU64::new(0);
static ALPHA_Y: AtomicU64 = AtomicU64::new(0);
static ALPHA_Z: AtomicU64 = AtomicU64::new(0);

fn store(slot: &AtomicU64, v: f64) {
    slot.store(v.to_bits(), Ordering::Relaxed);
}

fn load(slot: &AtomicU64) -> Option<f64> {
    let bits = slot.load(Ordering::Relaxed);
    if bits == 0 {
        None
    } else {
        Some(f64::from_bits(bits))
    }
}

/// Override α for the LMO and Meissel-family algorithms.
pub fn set_alpha(alpha: f64) {
    store(&ALPHA, alpha);
}

/// Override Gourdon's α_y.
pub fn set_alpha_y(alpha_y: f64) {
    store(&ALPHA_Y, alpha_y);
}

/// Override Gourdon's α_z.
pub fn set_alpha_z(alpha_z: f64) {
    store(&ALPHA_Z, alpha_z);
}

/// Drop all overrides, returning to the interpolated defaults.
pub fn clear_alphas() {
    ALPHA.store(0, Ordering::Relaxed);
    ALPHA_Y.store(0, Ordering::Relaxed);
    ALPHA_Z.store(0, Ordering::Relaxed);
}

/// Interpolate a tuning factor in [a_min, a_max] against log₁₀(x)
/// relative to log₁₀(x_min), additionally capped at x^(1/6) so that
/// y = α·x^(1/3) stays below √x.
pub fn get_alpha(x: u128, x_min: f64, a_min: f64, a_max: f64) -> f64 {
    debug_assert!(a_min >= 1.0 && a_max >= a_min);
    let cap = (iroot::<6>(x) as f64).max(1.0);
    if x < 2 {
        return 1.0;
    }
    let t = (x as f64).log10() / x_min.log10();
    let alpha = a_min * t * t * t;
    alpha.clamp(a_min, a_max).min(cap).max(1.0)
}

/// α for the LMO algorithms, honoring any override.
pub fn alpha_lmo(x: u128) -> f64 {
    validated(load(&ALPHA), x).unwrap_or_else(|| get_alpha(x, 1e15, 2.0, 300.0))
}

/// α_y for Gourdon, honoring any override.
pub fn alpha_y(x: u128) -> f64 {
    validated(load(&ALPHA_Y), x).unwrap_or_else(|| get_alpha(x, 1e15, 2.0, 64.0))
}

/// α_z for Gourdon, honoring any override.
pub fn alpha_z(x: u128) -> f64 {
    validated(load(&ALPHA_Z), x).unwrap_or_else(|| get_alpha(x, 1e15, 1.0, 8.0))
}

/// Overrides outside [1, x^(1/6)] are clamped into range rather than
/// rejected; every value in the documented envelope is result-neutral.
fn validated(v: Option<f64>, x: u128) -> Option<f64> {
    let cap = (iroot::<6>(x) as f64).max(1.0);
    v.filter(|a| a.is_finite()).map(|a| a.clamp(1.0, cap))
}
