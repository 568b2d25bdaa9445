//! # Status — Rate-Limited Progress Reporting
//!
//! Optional stderr progress lines from the long-running evaluators.
//! Printing is throttled to once per 0.1 s so the atomic fast path is all
//! a worker normally touches; the flag is process-wide and off by default
//! (the CLI enables it with `-s/--status`).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static PRINT_STATUS: AtomicBool = AtomicBool::new(false);

/// Enable or disable progress printing for subsequent computations.
pub fn set_print(enabled: bool) {
    PRINT_STATUS.store(enabled, Ordering::Relaxed);
}

/// Current process-wide setting.
pub fn is_print() -> bool {
    PRINT_STATUS.load(Ordering::Relaxed)
}

/// Only print if 0.1 seconds have elapsed since the last print.
const THRESHOLD_MS: u64 = 100;

pub struct Status {
    enabled: bool,
    start: Instant,
    last_print_ms: AtomicU64,
}

impl Status {
    pub fn new() -> Self {
        Status {
            enabled: is_print(),
            start: Instant::now(),
            last_print_ms: AtomicU64::new(0),
        }
    }

    /// Report progress through [0, limit). Safe to call from any worker;
    /// at most one thread wins the print slot per threshold window.
    pub fn print(&self, low: u64, limit: u64) {
        if !self.enabled || limit == 0 {
            return;
        }
        let elapsed = self.start.elapsed().as_millis() as u64;
        let last = self.last_print_ms.load(Ordering::Relaxed);
        if elapsed.saturating_sub(last) < THRESHOLD_MS {
            return;
        }
        if self
            .last_print_ms
            .compare_exchange(last, elapsed, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            let percent = 100.0 * low.min(limit) as f64 / limit as f64;
            eprint!("\rStatus: {:.0}%", percent);
        }
    }

    /// Terminate the status line once a computation completes.
    pub fn finish(&self) {
        if self.enabled {
            eprintln!("\rStatus: 100%");
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}
