//! CLI integration tests for the `primecount` binary.
//!
//! Exercise the command-line interface with `assert_cmd`: spawn the
//! compiled binary, assert on exit code, stdout, and stderr. Everything
//! here is self-contained — no network, no files, no environment beyond
//! the binary itself.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test cli_tests
//! ```
//!
//! # Testing strategy
//!
//! One tier verifies the argument surface (help, version, unknown and
//! malformed options, missing arguments). The other runs real counts
//! with small inputs and asserts the exact decimal output, covering every
//! algorithm flag, the expression parser, and the tuning overrides.

use assert_cmd::Command;
use predicates::prelude::*;

/// Command targeting the compiled `primecount` binary.
fn primecount() -> Command {
    Command::cargo_bin("primecount").unwrap()
}

// == Argument Surface ==========================================================

#[test]
fn no_arguments_prints_help_and_fails() {
    primecount()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_succeeds() {
    primecount()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("primecount"))
        .stdout(predicate::str::contains("--lmo"));
}

#[test]
fn version_flag_prints_version() {
    primecount()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    primecount()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("primecount"));
}

#[test]
fn unknown_option_fails_with_usage() {
    primecount()
        .arg("--unknown")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage").or(predicate::str::contains("unexpected")));
}

#[test]
fn malformed_number_fails() {
    primecount()
        .arg("1e")
        .assert()
        .failure()
        .stderr(predicate::str::contains("primecount:"));
    primecount().arg("abc").assert().failure();
    primecount().arg("1/0").assert().failure();
}

#[test]
fn conflicting_algorithm_flags_fail() {
    primecount()
        .args(["1000", "--lmo", "--legendre"])
        .assert()
        .failure();
}

#[test]
fn phi_without_second_argument_fails() {
    primecount()
        .args(["1000", "--phi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("phi"));
}

// == Counting ==================================================================

#[test]
fn default_algorithm_counts() {
    primecount()
        .arg("1000")
        .assert()
        .success()
        .stdout("168\n");
}

#[test]
fn lmo_with_threads_counts_1e9() {
    primecount()
        .args(["1e9", "--lmo", "-t", "4"])
        .assert()
        .success()
        .stdout("50847534\n");
}

#[test]
fn every_algorithm_flag_agrees_on_1e6() {
    for flag in [
        "--legendre",
        "-m",
        "--meissel",
        "-l",
        "--lehmer",
        "--lmo",
        "--lmo-simple",
        "-g",
        "-p",
    ] {
        primecount()
            .args(["1e6", flag])
            .assert()
            .success()
            .stdout("78498\n");
    }
}

#[test]
fn expression_arguments_are_exact() {
    primecount().arg("2^10").assert().success().stdout("172\n");
    primecount()
        .args(["--number", "999+1"])
        .assert()
        .success()
        .stdout("168\n");
}

#[test]
fn nthprime_flag() {
    primecount()
        .args(["1000", "-n"])
        .assert()
        .success()
        .stdout("7919\n");
    primecount()
        .args(["0", "--nthprime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}

#[test]
fn phi_flag() {
    primecount()
        .args(["1e6", "6", "--phi"])
        .assert()
        .success()
        .stdout("191808\n");
}

#[test]
fn li_flags_produce_numbers() {
    primecount()
        .args(["1e6", "--Li"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\n$").unwrap());
    primecount()
        .args(["78498", "--Li-inverse"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\n$").unwrap());
}

#[test]
fn tuning_overrides_do_not_change_output() {
    for alpha in ["1", "2", "5"] {
        primecount()
            .args(["1e6", "--alpha-y", alpha, "--alpha-z", alpha])
            .assert()
            .success()
            .stdout("78498\n");
    }
}

#[test]
fn status_and_time_go_to_stderr_only() {
    primecount()
        .args(["1e6", "--lmo", "-s", "--time"])
        .assert()
        .success()
        .stdout("78498\n")
        .stderr(predicate::str::contains("Seconds:"));
}

#[test]
#[ignore = "runs the full self-test; slow in debug builds"]
fn self_test_passes() {
    primecount()
        .arg("--test")
        .assert()
        .success()
        .stdout(predicate::str::contains("All tests passed successfully!"));
}
