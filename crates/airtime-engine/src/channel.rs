//! The shared medium and its collision arbitration.
//!
//! Stations register on the transmission list before any contender can
//! sense them and deregister exactly once when their transmission
//! concludes. The moment a second station joins the list, every member
//! that has not already been doomed receives a failure outcome at the
//! current instant, before virtual time advances, carrying the time
//! left in its own transmission.

use indexmap::IndexMap;
use tracing::debug;

use airtime_core::{SimTime, StationId};

use crate::event_queue::{EventPayload, EventQueue};

/// One entry in the channel's airtime history: a transmission as it was
/// admitted to the medium.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Airtime {
    /// The transmitting station.
    pub station: StationId,
    /// When the transmission was admitted.
    pub started_at: SimTime,
    /// When the transmission was scheduled to end.
    pub ends_at: SimTime,
    /// Whether the transmission was lost to a collision.
    pub collided: bool,
}

/// A transmission currently occupying the medium.
#[derive(Clone, Copy, Debug)]
struct Airing {
    ends_at: SimTime,
    epoch: u64,
    doomed: bool,
    history_index: usize,
}

/// The shared channel.
///
/// Tracks which stations are transmitting (in registration order, so
/// arbitration is deterministic), when the medium last became free, and
/// the full airtime history of the current run.
#[derive(Debug, Default)]
pub struct Channel {
    active: IndexMap<StationId, Airing>,
    free_since: SimTime,
    history: Vec<Airtime>,
}

impl Channel {
    /// Create an idle channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no transmission currently occupies the medium.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Whether the medium stayed free for the whole sensing window that
    /// started at `window_start` and ends now.
    ///
    /// This catches transmissions still on air as well as transmissions
    /// that began and ended strictly inside the window.
    pub fn idle_throughout(&self, window_start: SimTime) -> bool {
        self.active.is_empty() && self.free_since <= window_start
    }

    /// Number of stations currently on the transmission list.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Every transmission admitted since the last reset, in admission
    /// order.
    pub fn history(&self) -> &[Airtime] {
        &self.history
    }

    /// Admit a transmission to the medium.
    ///
    /// If the station is now the sole occupant, a success outcome is
    /// scheduled for `ends_at`. Otherwise every member that has not yet
    /// been doomed (including the newcomer) is doomed and receives a
    /// failure outcome at `now` with its own remaining time.
    pub(crate) fn begin_transmission(
        &mut self,
        queue: &mut EventQueue,
        now: SimTime,
        station: StationId,
        epoch: u64,
        ends_at: SimTime,
    ) {
        debug_assert!(
            !self.active.contains_key(&station),
            "station {station} is already transmitting"
        );
        let history_index = self.history.len();
        self.history.push(Airtime {
            station,
            started_at: now,
            ends_at,
            collided: false,
        });
        self.active.insert(
            station,
            Airing {
                ends_at,
                epoch,
                doomed: false,
                history_index,
            },
        );

        if self.active.len() == 1 {
            queue.push(
                ends_at,
                station,
                EventPayload::TransmissionOutcome {
                    epoch,
                    successful: true,
                    time_left: SimTime::ZERO,
                },
            );
            return;
        }

        debug!(at = %now, joined = %station, members = self.active.len(), "collision on channel");
        for (&member, airing) in self.active.iter_mut() {
            if airing.doomed {
                continue;
            }
            airing.doomed = true;
            self.history[airing.history_index].collided = true;
            queue.push(
                now,
                member,
                EventPayload::TransmissionOutcome {
                    epoch: airing.epoch,
                    successful: false,
                    time_left: airing.ends_at - now,
                },
            );
        }
    }

    /// Remove a station from the transmission list.
    ///
    /// Called exactly once per admitted transmission, when it concludes
    /// (at its scheduled end on success, after the collided remainder on
    /// failure). Frees the medium when the list empties.
    pub(crate) fn end_transmission(&mut self, now: SimTime, station: StationId) {
        let removed = self.active.shift_remove(&station);
        debug_assert!(removed.is_some(), "station {station} was not transmitting");
        if self.active.is_empty() {
            self.free_since = now;
        }
    }

    /// Restore the idle construction-time state between repetitions.
    pub fn reset(&mut self) {
        self.active.clear();
        self.free_since = SimTime::ZERO;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn micros(v: u64) -> SimTime {
        SimTime::from_micros(v)
    }

    fn outcome(ev: crate::event_queue::ScheduledEvent) -> (StationId, SimTime, bool, SimTime) {
        match ev.payload {
            EventPayload::TransmissionOutcome {
                successful,
                time_left,
                ..
            } => (ev.target, ev.key.time, successful, time_left),
            other => panic!("expected TransmissionOutcome, got {other:?}"),
        }
    }

    #[test]
    fn sole_transmission_gets_success_at_scheduled_end() {
        let mut channel = Channel::new();
        let mut queue = EventQueue::new();
        channel.begin_transmission(&mut queue, micros(9), StationId(0), 1, micros(18));
        assert!(!channel.is_idle());

        let (target, at, successful, time_left) = outcome(queue.pop().unwrap());
        assert_eq!(target, StationId(0));
        assert_eq!(at, micros(18));
        assert!(successful);
        assert!(time_left.is_zero());

        channel.end_transmission(micros(18), StationId(0));
        assert!(channel.is_idle());
        assert!(!channel.history()[0].collided);
    }

    #[test]
    fn second_member_dooms_both_with_their_own_remainders() {
        let mut channel = Channel::new();
        let mut queue = EventQueue::new();
        channel.begin_transmission(&mut queue, micros(0), StationId(0), 1, micros(100));
        let _stale_success = queue.pop().unwrap();

        channel.begin_transmission(&mut queue, micros(40), StationId(1), 1, micros(140));

        let (target, at, successful, time_left) = outcome(queue.pop().unwrap());
        assert_eq!(target, StationId(0));
        assert_eq!(at, micros(40));
        assert!(!successful);
        assert_eq!(time_left, micros(60));

        let (target, at, successful, time_left) = outcome(queue.pop().unwrap());
        assert_eq!(target, StationId(1));
        assert_eq!(at, micros(40));
        assert!(!successful);
        assert_eq!(time_left, micros(100));

        assert!(channel.history().iter().all(|a| a.collided));
    }

    #[test]
    fn third_member_does_not_doom_twice() {
        let mut channel = Channel::new();
        let mut queue = EventQueue::new();
        channel.begin_transmission(&mut queue, micros(0), StationId(0), 1, micros(100));
        channel.begin_transmission(&mut queue, micros(10), StationId(1), 1, micros(110));
        queue.clear();

        channel.begin_transmission(&mut queue, micros(20), StationId(2), 1, micros(120));

        // Only the newcomer is doomed now; the first two already were.
        assert_eq!(queue.len(), 1);
        let (target, _, successful, time_left) = outcome(queue.pop().unwrap());
        assert_eq!(target, StationId(2));
        assert!(!successful);
        assert_eq!(time_left, micros(100));
    }

    #[test]
    fn idle_throughout_sees_a_transmission_inside_the_window() {
        let mut channel = Channel::new();
        let mut queue = EventQueue::new();
        assert!(channel.idle_throughout(micros(0)));

        channel.begin_transmission(&mut queue, micros(10), StationId(0), 1, micros(20));
        channel.end_transmission(micros(20), StationId(0));

        // Window [5, 25]: the medium was busy in the middle.
        assert!(channel.is_idle());
        assert!(!channel.idle_throughout(micros(5)));
        // Window [20, 40]: free the whole way.
        assert!(channel.idle_throughout(micros(20)));
    }

    #[test]
    fn reset_restores_the_idle_state() {
        let mut channel = Channel::new();
        let mut queue = EventQueue::new();
        channel.begin_transmission(&mut queue, micros(10), StationId(0), 1, micros(20));
        channel.reset();
        assert!(channel.is_idle());
        assert!(channel.history().is_empty());
        assert!(channel.idle_throughout(micros(0)));
    }
}
