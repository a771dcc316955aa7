//! Frame-based access with a fixed muting cool-down.

use tracing::{debug, info};

use airtime_core::{StationId, StationKind, TxStats};
use airtime_engine::{Context, EventPayload, Station};

use crate::link::{Link, LinkEvent, StationConfig};

/// Muting phase of a [`FixedMutingFbe`] station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Muting {
    /// No cool-down pending; the station may contend.
    Clear,
    /// `n` muted frames remain before the station may contend again.
    Pending(u32),
}

/// Suspension point the frame loop is parked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Waiting out the initial offset.
    Boot,
    /// First init CCA running.
    InitCcaOne,
    /// Second init CCA running.
    InitCcaTwo,
    /// On air, awaiting the transmission outcome.
    Transmitting,
    /// Post-transmission idle window; arms the cool-down when it elapses.
    Dwell,
    /// A full silent frame deep inside the cool-down.
    MutedFrame,
    /// The `ffp - cca` stretch of a frame that closes with a CCA (last
    /// muted frame, or a busy-channel retry).
    FrameGap,
    /// The closing CCA of such a frame.
    FrameCca,
}

/// Frame-based access with a deterministic cool-down: after every
/// transmit-and-idle cycle the station stays silent for exactly
/// `muted_periods` frames before it may contend again, producing a
/// predictable duty cycle of one transmitting frame in
/// `muted_periods + 1`.
///
/// The cool-down dispatches on the remaining count: deep muted frames
/// pass without sensing, the last muted frame closes with a CCA, and an
/// exhausted cool-down over a busy channel keeps retrying a CCA every
/// frame until the channel is found idle.
#[derive(Debug)]
pub struct FixedMutingFbe {
    link: Link,
    muted_periods: u32,
    state: State,
    muting: Muting,
}

impl FixedMutingFbe {
    /// Build a station muting for `muted_periods` frames after each
    /// transmission cycle. Zero is permitted and degenerates to
    /// [`StandardFbe`](crate::StandardFbe)-like cadence.
    pub fn new(config: StationConfig, muted_periods: u32) -> Self {
        Self {
            link: Link::new(config),
            muted_periods,
            state: State::Boot,
            muting: Muting::Clear,
        }
    }

    /// Decide what to do with the frame that starts now.
    fn frame(&mut self, ctx: &mut Context<'_>) {
        let times = self.link.times();
        if self.link.channel_idle() && self.muting == Muting::Clear {
            self.state = State::Transmitting;
            self.link.begin_transmission(ctx);
            return;
        }
        match self.muting {
            Muting::Pending(n) if n > 1 => {
                self.state = State::MutedFrame;
                self.link.sleep(ctx, times.ffp());
            }
            // Last muted frame, or cool-down exhausted over a busy
            // channel: either way the frame closes with a CCA.
            _ => {
                self.state = State::FrameGap;
                self.link.sleep(ctx, times.frame_gap());
            }
        }
    }
}

impl Station for FixedMutingFbe {
    fn id(&self) -> StationId {
        self.link.id()
    }

    fn name(&self) -> &str {
        self.link.name()
    }

    fn kind(&self) -> StationKind {
        StationKind::FixedMuting
    }

    fn start(&mut self, ctx: &mut Context<'_>) {
        info!(at = %ctx.now(), station = %self.link.name(), "starting station");
        self.state = State::Boot;
        self.link.sleep(ctx, self.link.offset());
    }

    fn on_event(&mut self, ctx: &mut Context<'_>, payload: EventPayload) {
        let Some(event) = self.link.absorb(ctx, payload) else {
            return;
        };
        let times = self.link.times();
        match (self.state, event) {
            (State::Boot, LinkEvent::TimerElapsed) => {
                self.state = State::InitCcaOne;
                self.link.begin_cca(ctx);
            }
            (State::InitCcaOne, LinkEvent::CcaComplete { .. }) => {
                self.state = State::InitCcaTwo;
                self.link.begin_cca(ctx);
            }
            (State::InitCcaTwo, LinkEvent::CcaComplete { .. }) => self.frame(ctx),
            (State::Transmitting, LinkEvent::TxComplete { .. }) => {
                self.state = State::Dwell;
                self.link.sleep(ctx, times.idle_time());
            }
            (State::Dwell, LinkEvent::TimerElapsed) => {
                self.muting = match self.muted_periods {
                    0 => Muting::Clear,
                    n => Muting::Pending(n),
                };
                self.frame(ctx);
            }
            (State::MutedFrame, LinkEvent::TimerElapsed) => {
                if let Muting::Pending(n) = self.muting {
                    debug!(station = %self.link.name(), from = n, "decrementing muted period counter");
                    self.muting = Muting::Pending(n - 1);
                }
                self.frame(ctx);
            }
            (State::FrameGap, LinkEvent::TimerElapsed) => {
                self.state = State::FrameCca;
                self.link.begin_cca(ctx);
            }
            (State::FrameCca, LinkEvent::CcaComplete { .. }) => {
                // The last muted frame ends the cool-down whatever the
                // CCA found; a busy retry leaves the counter untouched.
                if self.muting == Muting::Pending(1) {
                    self.muting = Muting::Clear;
                }
                self.frame(ctx);
            }
            (state, event) => {
                debug!(station = %self.link.name(), ?state, ?event, "ignoring unexpected event");
            }
        }
    }

    fn reset(&mut self) {
        self.link.reset();
        self.state = State::Boot;
        self.muting = Muting::Clear;
    }

    fn stats(&self) -> TxStats {
        self.link.stats()
    }

    fn take_stats(&mut self) -> TxStats {
        self.link.take_stats()
    }
}
