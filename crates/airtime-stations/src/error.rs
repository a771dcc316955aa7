//! Station construction errors.

use std::error::Error;
use std::fmt;

/// Errors detected while constructing a station.
///
/// Phase lengths are drawn from `[1, n]`; a zero upper bound would make
/// the draw meaningless, so it is rejected before the simulation starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StationError {
    /// The transmission-phase draw bound is zero.
    ZeroTransmissionPeriods,
    /// The muted-phase draw bound is zero.
    ZeroMutedPeriods,
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTransmissionPeriods => {
                write!(f, "transmission period count must be at least 1")
            }
            Self::ZeroMutedPeriods => write!(f, "muted period count must be at least 1"),
        }
    }
}

impl Error for StationError {}
