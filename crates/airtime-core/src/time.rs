//! Virtual time for the discrete-event clock.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A point on (or span of) the simulation's virtual clock, in microseconds.
///
/// Virtual time is integer microseconds so that frame arithmetic is exact
/// and runs are bit-reproducible. The same type serves as instant and
/// duration, mirroring how the timing parameters combine: a wait of
/// `ffp - cca` starting at `now` ends at `now + (ffp - cca)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimTime(pub u64);

impl SimTime {
    /// The zero instant, where every run begins.
    pub const ZERO: SimTime = SimTime(0);

    /// Construct from a microsecond count.
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// The raw microsecond count.
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Whether this is the zero instant / an empty span.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl AddAssign for SimTime {
    fn add_assign(&mut self, rhs: SimTime) {
        self.0 += rhs.0;
    }
}

impl Sub for SimTime {
    type Output = SimTime;

    /// Span between two instants. Callers uphold `self >= rhs`; the FBE
    /// timing invariants (`cca <= idle_time <= ffp`) guarantee this for
    /// every subtraction on the simulation path.
    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 - rhs.0)
    }
}

impl SubAssign for SimTime {
    fn sub_assign(&mut self, rhs: SimTime) {
        self.0 -= rhs.0;
    }
}

impl Sum for SimTime {
    fn sum<I: Iterator<Item = SimTime>>(iter: I) -> SimTime {
        iter.fold(SimTime::ZERO, Add::add)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_round_trips() {
        let a = SimTime::from_micros(1000);
        let b = SimTime::from_micros(9);
        assert_eq!((a + b) - b, a);
        assert_eq!((a - b).as_micros(), 991);
    }

    #[test]
    fn assign_ops_match_binary_ops() {
        let mut t = SimTime::from_micros(50);
        t += SimTime::from_micros(25);
        assert_eq!(t, SimTime::from_micros(75));
        t -= SimTime::from_micros(75);
        assert_eq!(t, SimTime::ZERO);
        assert!(t.is_zero());
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(SimTime::from_micros(1) < SimTime::from_micros(2));
        assert_eq!(SimTime::ZERO, SimTime::default());
    }

    #[test]
    fn sum_of_spans() {
        let total: SimTime = [10, 20, 30].map(SimTime::from_micros).into_iter().sum();
        assert_eq!(total, SimTime::from_micros(60));
    }

    #[test]
    fn display_includes_unit() {
        assert_eq!(format!("{}", SimTime::from_micros(991)), "991us");
    }
}
