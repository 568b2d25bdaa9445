//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: algorithm
//! dispatch, argument evaluation, the self-test runner, and the Rayon
//! pool configuration.

use anyhow::{anyhow, bail, Result};
use primecount::{expr, status, tuning};
use std::time::Instant;
use tracing::{info, warn};

use super::Cli;

/// Evaluate, dispatch, print. The single number most commands need comes
/// from the positional `x` or `--number`; `--phi` consumes both
/// positionals.
pub fn run(cli: &Cli) -> Result<()> {
    if cli.version {
        println!("primecount {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if cli.test {
        return run_test();
    }

    status::set_print(cli.status);
    if let Some(alpha) = cli.alpha {
        tuning::set_alpha(alpha);
    }
    if let Some(alpha_y) = cli.alpha_y {
        tuning::set_alpha_y(alpha_y);
    }
    if let Some(alpha_z) = cli.alpha_z {
        tuning::set_alpha_z(alpha_z);
    }

    let x_input = cli
        .number
        .as_deref()
        .or(cli.x.as_deref())
        .ok_or_else(|| anyhow!("missing number argument; see --help"))?;

    let threads = primecount::get_num_threads();
    let start = Instant::now();
    let output = dispatch(cli, x_input, threads)?;
    println!("{}", output);

    if cli.time {
        eprintln!("Seconds: {:.3}", start.elapsed().as_secs_f64());
    }
    Ok(())
}

fn dispatch(cli: &Cli, x_input: &str, threads: usize) -> Result<String> {
    // The 128-bit-capable paths parse wide; everything else is u64.
    if cli.phi {
        let x = expr::eval_u128(x_input)?;
        let a_input = cli
            .a
            .as_deref()
            .ok_or_else(|| anyhow!("--phi needs two numbers: phi(x, a)"))?;
        let a = expr::eval_u64(a_input)?;
        return Ok(primecount::phi(x, a).to_string());
    }
    if cli.nthprime {
        let n = expr::eval_u64(x_input)?;
        return Ok(primecount::nth_prime(n)?.to_string());
    }
    if cli.li {
        let x = expr::eval_u128(x_input)?;
        return Ok(primecount::li(x).to_string());
    }
    if cli.li_inverse {
        let n = expr::eval_u128(x_input)?;
        return Ok(primecount::li_inverse(n).to_string());
    }

    if cli.legendre {
        return Ok(primecount::pi_legendre(expr::eval_u64(x_input)?).to_string());
    }
    if cli.meissel {
        return Ok(primecount::pi_meissel(expr::eval_u64(x_input)?, threads).to_string());
    }
    if cli.lehmer {
        return Ok(primecount::pi_lehmer(expr::eval_u64(x_input)?, threads).to_string());
    }
    if cli.lmo {
        return Ok(primecount::pi_lmo(expr::eval_u64(x_input)?, threads).to_string());
    }
    if cli.lmo_simple {
        return Ok(primecount::pi_lmo_simple(expr::eval_u64(x_input)?).to_string());
    }
    if cli.primesieve {
        return Ok(primecount::pi_primesieve(expr::eval_u64(x_input)?).to_string());
    }
    if cli.gourdon {
        return gourdon_count(x_input, threads);
    }

    // No algorithm flag: Gourdon is the default.
    gourdon_count(x_input, threads)
}

/// Gourdon on the 64- or 128-bit path, picked by input size.
fn gourdon_count(x_input: &str, threads: usize) -> Result<String> {
    let x = expr::eval_u128(x_input)?;
    if x <= u64::MAX as u128 {
        Ok(primecount::pi_gourdon_64(x as u64, threads).to_string())
    } else {
        Ok(primecount::pi_gourdon_128(x, threads)?.to_string())
    }
}

// ── Self-Test ───────────────────────────────────────────────────

/// Cross-check every algorithm against the sieve ground truth and each
/// other. Exits through an error (→ non-zero) on the first mismatch.
pub fn run_test() -> Result<()> {
    let threads = primecount::get_num_threads();
    info!(threads, "running self-test");

    // Deterministic pseudo-random inputs; no RNG dependency needed.
    let mut seed: u64 = 0x9e3779b97f4a7c15;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    check("iroot", || {
        for n in (0u128..100_000).chain([u64::MAX as u128]) {
            let r = primecount::imath::iroot::<3>(n) as u128;
            if !(r * r * r <= n && (r + 1) * (r + 1) * (r + 1) > n) {
                return Err(anyhow!("iroot<3>({}) = {}", n, r));
            }
        }
        Ok(())
    })?;

    check("pi agreement on [0, 5000)", || {
        for x in 0u64..5000 {
            let expected = primecount::pi_cache(x);
            for (name, got) in [
                ("legendre", primecount::pi_legendre(x)),
                ("meissel", primecount::pi_meissel(x, threads)),
                ("lehmer", primecount::pi_lehmer(x, threads)),
                ("lmo_simple", primecount::pi_lmo_simple(x)),
                ("lmo", primecount::pi_lmo(x, threads)),
                ("gourdon", primecount::pi_gourdon_64(x, threads)),
            ] {
                if got != expected {
                    return Err(anyhow!("pi_{}({}) = {}, expected {}", name, x, got, expected));
                }
            }
        }
        Ok(())
    })?;

    check("pi agreement on random medium x", || {
        for _ in 0..40 {
            let x = 10_000 + next() % 2_000_000;
            let expected = primecount::pi_cache(x);
            let lmo = primecount::pi_lmo(x, threads);
            let gourdon = primecount::pi_gourdon_64(x, threads);
            if lmo != expected || gourdon != expected {
                return Err(anyhow!(
                    "x = {}: lmo = {}, gourdon = {}, expected {}",
                    x,
                    lmo,
                    gourdon,
                    expected
                ));
            }
        }
        Ok(())
    })?;

    check("alpha_y invariance", || {
        for x in [1234u64, 99_991, 500_000] {
            let expected = primecount::pi_cache(x);
            let cap = primecount::imath::iroot::<6>(x as u128).max(1);
            for alpha_y in 1..=cap {
                tuning::set_alpha_y(alpha_y as f64);
                let got = primecount::pi_gourdon_64(x, threads);
                if got != expected {
                    tuning::clear_alphas();
                    return Err(anyhow!(
                        "alpha_y = {}: pi_gourdon({}) = {}, expected {}",
                        alpha_y,
                        x,
                        got,
                        expected
                    ));
                }
            }
        }
        tuning::clear_alphas();
        Ok(())
    })?;

    check("nth_prime round trip", || {
        for _ in 0..20 {
            let n = 1 + next() % 50_000;
            let p = primecount::nth_prime(n)?;
            if primecount::pi(p) != n {
                return Err(anyhow!("pi(nth_prime({})) != {}", n, p));
            }
        }
        Ok(())
    })?;

    println!("All tests passed successfully!");
    Ok(())
}

fn check(name: &str, f: impl FnOnce() -> Result<()>) -> Result<()> {
    print!("Testing {:<32}", name);
    match f() {
        Ok(()) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("ERROR");
            bail!("self-test '{}' failed: {}", name, e)
        }
    }
}

// ── Rayon Configuration ─────────────────────────────────────────

/// Configure the global rayon pool once, before any parallel work runs.
pub fn configure_rayon(threads: Option<usize>) {
    if let Some(n) = threads {
        if n > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
                warn!(error = %e, "could not configure the rayon thread pool");
            }
        }
    }
}
