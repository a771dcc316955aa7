//! Construction-time error types.

use std::error::Error;
use std::fmt;

use crate::time::SimTime;

/// Errors detected while validating FBE timing parameters.
///
/// Timing is validated once at construction; an invalid combination never
/// reaches the simulation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingError {
    /// The fixed frame period is zero.
    ZeroFramePeriod,
    /// The idle window fills (or exceeds) the whole frame, leaving no
    /// transmission time.
    IdleTimeConsumesFrame {
        /// The configured idle window.
        idle_time: SimTime,
        /// The configured fixed frame period.
        ffp: SimTime,
    },
    /// The sensing window does not fit inside the idle window.
    CcaExceedsIdleTime {
        /// The configured sensing duration.
        cca: SimTime,
        /// The configured idle window.
        idle_time: SimTime,
    },
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFramePeriod => write!(f, "fixed frame period must be positive"),
            Self::IdleTimeConsumesFrame { idle_time, ffp } => {
                write!(
                    f,
                    "idle time {idle_time} leaves no transmission time in frame period {ffp}"
                )
            }
            Self::CcaExceedsIdleTime { cca, idle_time } => {
                write!(f, "cca {cca} exceeds idle time {idle_time}")
            }
        }
    }
}

impl Error for TimingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_values() {
        let err = TimingError::CcaExceedsIdleTime {
            cca: SimTime::from_micros(20),
            idle_time: SimTime::from_micros(9),
        };
        let msg = format!("{err}");
        assert!(msg.contains("20us"));
        assert!(msg.contains("9us"));
    }
}
