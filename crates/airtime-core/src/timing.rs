//! FBE timing parameters, validated once at construction.

use crate::error::TimingError;
use crate::time::SimTime;

/// The three durations governing a station's frame cycle.
///
/// - `cca`: length of one Clear Channel Assessment (sensing window).
/// - `ffp`: the Fixed Frame Period, the length of every frame.
/// - `idle_time`: the window reserved at the end of a frame that carried
///   a transmission; its last `cca` microseconds hold the next CCA.
///
/// The three are supplied independently and validated together:
/// `ffp > 0`, `cca <= idle_time` and `idle_time < ffp`. The remainder
/// `ffp - idle_time` is the per-frame transmission time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FbeTimes {
    cca: SimTime,
    ffp: SimTime,
    idle_time: SimTime,
}

impl FbeTimes {
    /// Validate and construct a timing set.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError`] when the frame period is zero, the idle
    /// window leaves no transmission time, or the sensing window does
    /// not fit inside the idle window.
    pub fn new(cca: SimTime, ffp: SimTime, idle_time: SimTime) -> Result<Self, TimingError> {
        if ffp.is_zero() {
            return Err(TimingError::ZeroFramePeriod);
        }
        if idle_time >= ffp {
            return Err(TimingError::IdleTimeConsumesFrame { idle_time, ffp });
        }
        if cca > idle_time {
            return Err(TimingError::CcaExceedsIdleTime { cca, idle_time });
        }
        Ok(Self {
            cca,
            ffp,
            idle_time,
        })
    }

    /// The sensing (CCA) duration.
    pub fn cca(&self) -> SimTime {
        self.cca
    }

    /// The fixed frame period.
    pub fn ffp(&self) -> SimTime {
        self.ffp
    }

    /// The idle window closing a transmitting frame.
    pub fn idle_time(&self) -> SimTime {
        self.idle_time
    }

    /// Time spent on air per transmitting frame: `ffp - idle_time`.
    pub fn transmission_time(&self) -> SimTime {
        self.ffp - self.idle_time
    }

    /// Silent stretch of a frame that closes with a CCA: `ffp - cca`.
    pub fn frame_gap(&self) -> SimTime {
        self.ffp - self.cca
    }

    /// Post-transmission wait before the closing CCA: `idle_time - cca`.
    pub fn idle_gap(&self) -> SimTime {
        self.idle_time - self.cca
    }
}
