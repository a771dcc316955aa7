//! Transmission outcome counters.

use std::ops::{Add, AddAssign};

/// Success/failure counters for one station.
///
/// Incremented exactly once per concluded transmission: successes at the
/// scheduled end of an uncontested transmission, failures once the
/// collided remainder has been waited out. These counters are the
/// functional output of a run; the scenario runner harvests them with
/// [`take`](TxStats::take) between repetitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TxStats {
    /// Transmissions that completed without a collision.
    pub successes: u64,
    /// Transmissions lost to a collision.
    pub failures: u64,
}

impl TxStats {
    /// Record one successful transmission.
    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    /// Record one failed (collided) transmission.
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Total concluded transmissions.
    pub fn attempts(self) -> u64 {
        self.successes + self.failures
    }

    /// Return the current counters and reset them to zero.
    pub fn take(&mut self) -> TxStats {
        std::mem::take(self)
    }
}

impl Add for TxStats {
    type Output = TxStats;

    fn add(self, rhs: TxStats) -> TxStats {
        TxStats {
            successes: self.successes + rhs.successes,
            failures: self.failures + rhs.failures,
        }
    }
}

impl AddAssign for TxStats {
    fn add_assign(&mut self, rhs: TxStats) {
        *self = *self + rhs;
    }
}
