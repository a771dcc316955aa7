//! The link capability shared by every station policy.
//!
//! `Link` owns the mechanics common to all variants (the initial offset
//! wait, CCA windows, transmission with collision recovery, outcome
//! recording) and reports macro-level happenings ([`LinkEvent`]) up to
//! the policy's frame-level state machine. Policies compose a `Link`
//! rather than inheriting from a base station.

use tracing::{debug, trace};

use airtime_core::{FbeTimes, SimTime, StationId, TxStats};
use airtime_engine::{Context, EventPayload};

/// Construction parameters shared by every station variant.
#[derive(Clone, Debug)]
pub struct StationConfig {
    /// Dense identifier (the station's position in its run group).
    pub id: StationId,
    /// Human-readable name for logs and reports.
    pub name: String,
    /// Validated FBE timing parameters.
    pub times: FbeTimes,
    /// Initial desynchronization delay before the first CCA.
    pub offset: SimTime,
}

/// Sub-step the link is currently suspended in.
///
/// `Reporting` is the zero-delay turn between a sensing window closing
/// and the policy reacting to it. Evaluating the channel at the window's
/// end but acting one queue turn later reproduces the cooperative
/// framework this model comes from: two stations whose windows close at
/// the same instant both observe "idle" before either starts
/// transmitting, which is the only way simultaneous sensers can go on
/// to collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Micro {
    /// Waiting out a plain timer.
    Parked,
    /// Inside a sensing window that opened at `since`.
    Sensing { since: SimTime },
    /// Sensing done; the result is delivered next turn.
    Reporting,
    /// On the channel's transmission list, awaiting the outcome.
    Transmitting,
    /// Collided; waiting out the reported remainder.
    Recovering,
}

/// Macro-level happening reported up to a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LinkEvent {
    /// A requested sleep elapsed.
    TimerElapsed,
    /// A sensing window closed; `idle` is the fresh channel verdict.
    CcaComplete { idle: bool },
    /// A transmission concluded and was deregistered.
    TxComplete { successful: bool },
}

/// Shared station mechanics, composed into each policy.
#[derive(Debug)]
pub(crate) struct Link {
    id: StationId,
    name: String,
    times: FbeTimes,
    offset: SimTime,
    channel_idle: bool,
    stats: TxStats,
    epoch: u64,
    micro: Micro,
}

impl Link {
    pub fn new(config: StationConfig) -> Self {
        Self {
            id: config.id,
            name: config.name,
            times: config.times,
            offset: config.offset,
            channel_idle: false,
            stats: TxStats::default(),
            epoch: 0,
            micro: Micro::Parked,
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn times(&self) -> FbeTimes {
        self.times
    }

    pub fn offset(&self) -> SimTime {
        self.offset
    }

    /// Verdict of the most recent sensing window.
    pub fn channel_idle(&self) -> bool {
        self.channel_idle
    }

    pub fn stats(&self) -> TxStats {
        self.stats
    }

    pub fn take_stats(&mut self) -> TxStats {
        self.stats.take()
    }

    /// Suspend for `delay`; resumes as [`LinkEvent::TimerElapsed`].
    pub fn sleep(&mut self, ctx: &mut Context<'_>, delay: SimTime) {
        self.micro = Micro::Parked;
        ctx.wake_in(delay);
    }

    /// Open a sensing window of the configured CCA length; resumes as
    /// [`LinkEvent::CcaComplete`].
    pub fn begin_cca(&mut self, ctx: &mut Context<'_>) {
        self.micro = Micro::Sensing { since: ctx.now() };
        ctx.wake_in(self.times.cca());
    }

    /// Register on the channel and transmit for the frame's remaining
    /// time; resumes as [`LinkEvent::TxComplete`] once the outcome (and
    /// on failure the collided remainder) has been absorbed.
    pub fn begin_transmission(&mut self, ctx: &mut Context<'_>) {
        self.epoch += 1;
        self.micro = Micro::Transmitting;
        let ends_at = ctx.now() + self.times.transmission_time();
        debug!(station = %self.name, at = %ctx.now(), until = %ends_at, "transmission start");
        ctx.begin_transmission(self.epoch, ends_at);
    }

    /// Translate a raw engine event into a macro-level [`LinkEvent`].
    ///
    /// Returns `None` while a multi-step sub-process (sensing report,
    /// collision recovery) is still in flight, and for stale outcome
    /// events left over from a collided transmission.
    pub fn absorb(&mut self, ctx: &mut Context<'_>, payload: EventPayload) -> Option<LinkEvent> {
        match (self.micro, payload) {
            (Micro::Parked, EventPayload::Wake) => Some(LinkEvent::TimerElapsed),
            (Micro::Sensing { since }, EventPayload::Wake) => {
                self.channel_idle = ctx.channel().idle_throughout(since);
                self.micro = Micro::Reporting;
                ctx.wake_in(SimTime::ZERO);
                None
            }
            (Micro::Reporting, EventPayload::Wake) => {
                self.micro = Micro::Parked;
                Some(LinkEvent::CcaComplete {
                    idle: self.channel_idle,
                })
            }
            (
                Micro::Transmitting,
                EventPayload::TransmissionOutcome {
                    epoch,
                    successful: true,
                    ..
                },
            ) if epoch == self.epoch => {
                self.stats.record_success();
                self.micro = Micro::Parked;
                ctx.end_transmission();
                Some(LinkEvent::TxComplete { successful: true })
            }
            (
                Micro::Transmitting,
                EventPayload::TransmissionOutcome {
                    epoch,
                    successful: false,
                    time_left,
                },
            ) if epoch == self.epoch => {
                debug!(
                    station = %self.name,
                    at = %ctx.now(),
                    remaining = %time_left,
                    "collision, waiting out remainder"
                );
                self.micro = Micro::Recovering;
                ctx.wake_in(time_left);
                None
            }
            (Micro::Recovering, EventPayload::Wake) => {
                self.stats.record_failure();
                self.micro = Micro::Parked;
                ctx.end_transmission();
                Some(LinkEvent::TxComplete { successful: false })
            }
            (micro, payload) => {
                trace!(station = %self.name, ?micro, ?payload, "ignoring stale event");
                None
            }
        }
    }

    /// Restore base-level flags to their construction-time values.
    /// Variants extend this with their own counters.
    pub fn reset(&mut self) {
        self.channel_idle = false;
        self.epoch = 0;
        self.micro = Micro::Parked;
    }
}
