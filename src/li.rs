//! # Li — Logarithmic Integral and Its Inverse
//!
//! Analytic companions to the exact counters: Li(x) approximates π(x)
//! within O(√x·log x) in the verified range, which makes Li⁻¹(n) an
//! excellent starting guess for `nth_prime`. Both are f64 kernels — they
//! never sit on a correctness path; exact code only uses them to decide
//! where to start looking.
//!
//! li(x) is evaluated by the classic series
//! li(x) = γ + ln ln x + Σ_{k≥1} (ln x)^k / (k·k!), and the offset
//! Li(x) = li(x) − li(2) removes the singularity's contribution below 2.
//! The inverse runs Newton on Li with d/dt Li(t) = 1/ln t.

/// Euler–Mascheroni constant.
const GAMMA: f64 = 0.577_215_664_901_532_9;

/// li(2), subtracted for the offset logarithmic integral.
const LI2: f64 = 1.045_163_780_117_492_8;

fn li_f64(x: f64) -> f64 {
    if x < 2.0 {
        return 0.0;
    }
    let lnx = x.ln();
    let mut sum = GAMMA + lnx.ln();
    let mut term = 1.0f64;
    for k in 1..400 {
        term *= lnx / k as f64;
        let delta = term / k as f64;
        sum += delta;
        if delta < sum.abs() * 1e-16 {
            break;
        }
    }
    sum
}

/// Offset logarithmic integral ⌊Li(x)⌋ = ⌊li(x) − li(2)⌋.
pub fn li(x: u128) -> u128 {
    if x < 2 {
        return 0;
    }
    (li_f64(x as f64) - LI2).max(0.0) as u128
}

/// ⌊Li⁻¹(n)⌋: the t with Li(t) ≈ n, by Newton iteration.
pub fn li_inverse(n: u128) -> u128 {
    if n < 2 {
        return if n == 0 { 0 } else { 2 };
    }
    let target = n as f64;
    // p_n ≈ n·ln n is a fine seed for n ≥ 2.
    let mut t = (target * target.ln().max(1.0)).max(3.0);
    for _ in 0..100 {
        let f = li_f64(t) - LI2 - target;
        let step = f * t.ln();
        let next = (t - step).max(2.0);
        if (next - t).abs() < 0.5 {
            t = next;
            break;
        }
        t = next;
    }
    t as u128
}
