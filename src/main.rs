//! # Main — Console Entry Point
//!
//! Thin argv layer over the library: parses the options, configures the
//! Rayon pool and logging, and hands off to [`cli::run`]. Numeric
//! arguments go through the expression parser, so `primecount 2^40 --lmo`
//! and `primecount 1e15 -t 8` both work.
//!
//! ## Options
//!
//! One positional number x (plus a second one for `--phi`), a flag per
//! algorithm (`--legendre`, `-m/--meissel`, `-l/--lehmer`, `--lmo`,
//! `--lmo-simple`, `--Li`, `--Li-inverse`, `-n/--nthprime`, `--phi`,
//! `-p/--primesieve`, `-g/--gourdon` as the default), `-t/--threads`,
//! `-s/--status`, `--time`, the tuning overrides `--alpha`, `--alpha-y`,
//! `--alpha-z`, and `--test` for the self-test. `LOG_FORMAT=json`
//! switches the tracing output for machine consumption.

mod cli;

use anyhow::Result;
use clap::Parser;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "primecount",
    version,
    disable_version_flag = true,
    about = "Count the primes below x with sub-linear combinatorial algorithms",
    arg_required_else_help = true
)]
struct Cli {
    /// Number x; arithmetic expressions are evaluated exactly (1e15, 2^40, (1+2)*3)
    x: Option<String>,

    /// Second number for --phi: count integers ≤ x coprime to the first A primes
    a: Option<String>,

    /// Alternative way to pass the number x
    #[arg(long, value_name = "VAL")]
    number: Option<String>,

    /// Count primes with Legendre's formula
    #[arg(long, group = "algorithm")]
    legendre: bool,

    /// Count primes with Meissel's formula
    #[arg(short = 'm', long, group = "algorithm")]
    meissel: bool,

    /// Count primes with Lehmer's formula
    #[arg(short = 'l', long, group = "algorithm")]
    lehmer: bool,

    /// Count primes with the segmented Lagarias-Miller-Odlyzko algorithm
    #[arg(long, group = "algorithm")]
    lmo: bool,

    /// Count primes with the unsegmented single-thread LMO reference
    #[arg(long = "lmo-simple", alias = "lmo_simple", group = "algorithm")]
    lmo_simple: bool,

    /// Count primes with Gourdon's algorithm (the default)
    #[arg(short = 'g', long, group = "algorithm")]
    gourdon: bool,

    /// Approximate pi(x) with the offset logarithmic integral Li(x)
    #[arg(long = "Li", group = "algorithm")]
    li: bool,

    /// Approximate the n-th prime with Li^-1(n)
    #[arg(long = "Li-inverse", alias = "Li_inverse", group = "algorithm")]
    li_inverse: bool,

    /// Print the n-th prime
    #[arg(short = 'n', long, group = "algorithm")]
    nthprime: bool,

    /// Print phi(x, a): integers ≤ x coprime to the first a primes
    #[arg(long, group = "algorithm")]
    phi: bool,

    /// Count primes by direct segmented sieving
    #[arg(short = 'p', long, group = "algorithm")]
    primesieve: bool,

    /// Number of worker threads (defaults to all logical cores)
    #[arg(short = 't', long, env = "PRIMECOUNT_THREADS")]
    threads: Option<usize>,

    /// Print progress to stderr while computing
    #[arg(short = 's', long)]
    status: bool,

    /// Print the elapsed time to stderr once done
    #[arg(long)]
    time: bool,

    /// Tuning factor alpha for the LMO/Meissel family (performance only)
    #[arg(long)]
    alpha: Option<f64>,

    /// Tuning factor alpha_y for Gourdon (performance only)
    #[arg(long = "alpha-y", alias = "alpha_y")]
    alpha_y: Option<f64>,

    /// Tuning factor alpha_z for Gourdon (performance only)
    #[arg(long = "alpha-z", alias = "alpha_z")]
    alpha_z: Option<f64>,

    /// Run the self-test and exit non-zero on any mismatch
    #[arg(long)]
    test: bool,

    /// Print version information
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() -> Result<()> {
    // LOG_FORMAT=json for machine-readable logs, human-readable otherwise.
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match cli::run(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("primecount: {}", e);
            std::process::exit(1);
        }
    }
}
