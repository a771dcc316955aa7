//! The horizon-bounded simulation runner.

use std::error::Error;
use std::fmt;

use tracing::debug;

use airtime_core::{SimTime, StationId};

use crate::channel::Channel;
use crate::event_queue::EventQueue;
use crate::rng::SimRng;
use crate::station::{Context, Station};

// ── RunMetrics ──────────────────────────────────────────────────

/// Bookkeeping from one completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Events dispatched before the horizon cut scheduling off.
    pub events_processed: u64,
    /// The horizon the run was bounded by.
    pub end_time: SimTime,
}

// ── RunError ────────────────────────────────────────────────────

/// Errors detected before any event is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunError {
    /// The run group is empty.
    NoStations,
    /// Station IDs must be dense positions: `stations[n]` carries
    /// `StationId(n)`.
    MisnumberedStation {
        /// The ID implied by the station's position.
        expected: StationId,
        /// The ID the station actually carries.
        found: StationId,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStations => write!(f, "run group has no stations"),
            Self::MisnumberedStation { expected, found } => {
                write!(f, "station at position {expected} carries id {found}")
            }
        }
    }
}

impl Error for RunError {}

// ── Simulation ──────────────────────────────────────────────────

/// Single-threaded cooperative simulation of one station group.
///
/// Owns the virtual clock, the event queue, the shared channel and the
/// random source. [`run`](Simulation::run) drives the stations until the
/// horizon; [`reset`](Simulation::reset) restores everything except the
/// random source for the next repetition, so repeated trials keep
/// drawing fresh randomness while staying replayable from the seed.
#[derive(Debug)]
pub struct Simulation {
    clock: SimTime,
    horizon: SimTime,
    queue: EventQueue,
    channel: Channel,
    rng: SimRng,
}

impl Simulation {
    /// Create a simulation bounded by `horizon`, with randomness seeded
    /// from `seed`.
    pub fn new(horizon: SimTime, seed: u64) -> Self {
        Self {
            clock: SimTime::ZERO,
            horizon,
            queue: EventQueue::new(),
            channel: Channel::new(),
            rng: SimRng::seeded(seed),
        }
    }

    /// The current virtual time.
    pub fn now(&self) -> SimTime {
        self.clock
    }

    /// The simulation horizon.
    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    /// Read-only view of the shared channel (history, occupancy).
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Run one repetition to the horizon.
    ///
    /// Starts every station at virtual time zero (in slice order, which
    /// fixes the tie-break for simultaneous events), then pops events in
    /// nondecreasing `(time, sequence)` order and dispatches each to its
    /// target. Events stamped beyond the horizon are never delivered;
    /// events at exactly the horizon still run.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the group is empty or a station's ID
    /// does not match its position.
    pub fn run(&mut self, stations: &mut [Box<dyn Station>]) -> Result<RunMetrics, RunError> {
        if stations.is_empty() {
            return Err(RunError::NoStations);
        }
        for (position, station) in stations.iter().enumerate() {
            let expected = StationId(position as u32);
            if station.id() != expected {
                return Err(RunError::MisnumberedStation {
                    expected,
                    found: station.id(),
                });
            }
        }

        for station in stations.iter_mut() {
            let mut ctx = Context {
                now: self.clock,
                station: station.id(),
                channel: &mut self.channel,
                rng: &mut self.rng,
                queue: &mut self.queue,
            };
            station.start(&mut ctx);
        }

        let mut events_processed = 0u64;
        while let Some(event) = self.queue.pop() {
            if event.key.time > self.horizon {
                break;
            }
            self.clock = event.key.time;
            let station = &mut stations[event.target.0 as usize];
            let mut ctx = Context {
                now: self.clock,
                station: event.target,
                channel: &mut self.channel,
                rng: &mut self.rng,
                queue: &mut self.queue,
            };
            station.on_event(&mut ctx, event.payload);
            events_processed += 1;
        }

        debug!(events = events_processed, horizon = %self.horizon, "run complete");
        Ok(RunMetrics {
            events_processed,
            end_time: self.horizon,
        })
    }

    /// Restore the pre-run state for the next repetition: clock to zero,
    /// queue emptied, channel idle. The random source keeps advancing.
    pub fn reset(&mut self) {
        self.clock = SimTime::ZERO;
        self.queue.clear();
        self.channel.reset();
    }
}
