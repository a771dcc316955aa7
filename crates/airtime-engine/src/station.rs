//! The station seam: the trait the engine drives and the context it
//! hands to stations.

use airtime_core::{SimTime, StationId, StationKind, TxStats};

use crate::channel::Channel;
use crate::event_queue::{EventPayload, EventQueue};
use crate::rng::SimRng;

/// Engine-owned resources borrowed by a station for one event dispatch.
///
/// All side effects a station can have (scheduling its own wake-ups,
/// drawing randomness, occupying and releasing the channel) go through
/// this context, which keeps the transmission-list discipline (register
/// before contenders can sense, deregister exactly once) in one place.
pub struct Context<'a> {
    pub(crate) now: SimTime,
    pub(crate) station: StationId,
    pub(crate) channel: &'a mut Channel,
    pub(crate) rng: &'a mut SimRng,
    pub(crate) queue: &'a mut EventQueue,
}

impl Context<'_> {
    /// The current virtual time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Read-only view of the shared channel.
    pub fn channel(&self) -> &Channel {
        self.channel
    }

    /// Suspend the station: schedule a [`EventPayload::Wake`] for itself
    /// `delay` from now. A zero delay yields one queue turn at the
    /// current instant.
    pub fn wake_in(&mut self, delay: SimTime) {
        self.queue
            .push(self.now + delay, self.station, EventPayload::Wake);
    }

    /// Uniform draw from `[1, bound]` inclusive.
    pub fn draw(&mut self, bound: u32) -> u32 {
        self.rng.draw(bound)
    }

    /// Register on the channel's transmission list and start a
    /// transmission ending at `ends_at`. The outcome arrives later as a
    /// [`EventPayload::TransmissionOutcome`] carrying `epoch`.
    pub fn begin_transmission(&mut self, epoch: u64, ends_at: SimTime) {
        self.channel
            .begin_transmission(self.queue, self.now, self.station, epoch, ends_at);
    }

    /// Deregister from the channel's transmission list.
    pub fn end_transmission(&mut self) {
        self.channel.end_transmission(self.now, self.station);
    }
}

/// A per-station control loop driven by the engine.
///
/// Exactly one such loop runs per station per repetition. The engine
/// calls [`start`](Station::start) once, then delivers events until the
/// horizon; stations never self-terminate.
pub trait Station {
    /// The station's dense identifier (its position in the run group).
    fn id(&self) -> StationId;

    /// Human-readable name, used in logs and reports.
    fn name(&self) -> &str;

    /// The variant tag, used only for reporting.
    fn kind(&self) -> StationKind;

    /// Schedule the first suspension (the initial desynchronization
    /// offset). Called once per run, at virtual time zero.
    fn start(&mut self, ctx: &mut Context<'_>);

    /// React to one delivered event.
    fn on_event(&mut self, ctx: &mut Context<'_>, payload: EventPayload);

    /// Restore counters and flags to their construction-time values,
    /// leaving identity and configuration intact. Called between
    /// repetitions.
    fn reset(&mut self);

    /// The station's accumulated transmission statistics.
    fn stats(&self) -> TxStats;

    /// Harvest the statistics, resetting them to zero.
    fn take_stats(&mut self) -> TxStats;
}
