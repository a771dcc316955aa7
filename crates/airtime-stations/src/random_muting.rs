//! Frame-based access with randomly drawn transmission and muting
//! phases.

use tracing::{debug, info};

use airtime_core::{StationId, StationKind, TxStats};
use airtime_engine::{Context, EventPayload, Station};

use crate::error::StationError;
use crate::link::{Link, LinkEvent, StationConfig};

/// Phase cycle of a [`RandomMutingFbe`] station.
///
/// The counters of the two active phases are mutually exclusive, so one
/// tagged value replaces a pair of sentinel integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cycle {
    /// Neither phase armed: contend with one CCA per frame.
    Contending,
    /// Transmission phase with `n` frames remaining (`n >= 1`).
    Transmitting(u32),
    /// Muted phase with `n` frames remaining (`n >= 1`).
    Muted(u32),
}

/// Suspension point the frame loop is parked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Waiting out the initial offset.
    Boot,
    /// The init CCA; arms the first transmission phase when idle.
    InitCca,
    /// Silent stretch of a contention frame.
    FrameGap,
    /// Closing CCA of a contention frame.
    FrameCca,
    /// On air, awaiting the transmission outcome.
    Transmitting,
    /// Post-transmission wait before the frame's closing CCA.
    Settle,
    /// The CCA closing a transmitting frame; decides whether the phase
    /// continues.
    SettleCca,
    /// A full silent frame deep inside the muted phase.
    MutedFrame,
    /// Silent stretch of the last muted frame.
    FinalMuteGap,
    /// Closing CCA of the last muted frame; may arm the next
    /// transmission phase directly.
    FinalMuteCca,
}

/// Frame-based access alternating randomly drawn phases.
///
/// A transmission phase of `n ∈ [1, transmission_periods]` frames runs
/// while the channel stays idle, then a muted phase of
/// `m ∈ [1, muted_periods]` frames follows. A collision truncates the
/// transmission phase immediately: the failure outcome forces the cycle
/// back to contention regardless of where the frame loop currently is.
#[derive(Debug)]
pub struct RandomMutingFbe {
    link: Link,
    transmission_periods: u32,
    muted_periods: u32,
    state: State,
    cycle: Cycle,
}

impl RandomMutingFbe {
    /// Build a station drawing transmission phases from
    /// `[1, transmission_periods]` and muted phases from
    /// `[1, muted_periods]`.
    ///
    /// # Errors
    ///
    /// Returns [`StationError`] when either draw bound is zero.
    pub fn new(
        config: StationConfig,
        transmission_periods: u32,
        muted_periods: u32,
    ) -> Result<Self, StationError> {
        if transmission_periods == 0 {
            return Err(StationError::ZeroTransmissionPeriods);
        }
        if muted_periods == 0 {
            return Err(StationError::ZeroMutedPeriods);
        }
        Ok(Self {
            link: Link::new(config),
            transmission_periods,
            muted_periods,
            state: State::Boot,
            cycle: Cycle::Contending,
        })
    }

    /// Draw a fresh transmission phase length.
    fn arm_transmission(&mut self, ctx: &mut Context<'_>) {
        let drawn = ctx.draw(self.transmission_periods);
        debug!(station = %self.link.name(), drawn, "channel idle, arming transmission phase");
        self.cycle = Cycle::Transmitting(drawn);
    }

    /// Decide what to do with the frame that starts now.
    fn frame(&mut self, ctx: &mut Context<'_>) {
        let times = self.link.times();
        match self.cycle {
            Cycle::Transmitting(n) => {
                debug!(station = %self.link.name(), remaining = n, "transmission phase frame");
                self.state = State::Transmitting;
                self.link.begin_transmission(ctx);
            }
            Cycle::Muted(1) => {
                debug!(station = %self.link.name(), "last muted frame, closing with a CCA");
                self.state = State::FinalMuteGap;
                self.link.sleep(ctx, times.frame_gap());
            }
            Cycle::Muted(n) => {
                debug!(station = %self.link.name(), remaining = n, "muted frame");
                self.state = State::MutedFrame;
                self.link.sleep(ctx, times.ffp());
            }
            Cycle::Contending => {
                self.state = State::FrameGap;
                self.link.sleep(ctx, times.frame_gap());
            }
        }
    }
}

impl Station for RandomMutingFbe {
    fn id(&self) -> StationId {
        self.link.id()
    }

    fn name(&self) -> &str {
        self.link.name()
    }

    fn kind(&self) -> StationKind {
        StationKind::RandomMuting
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
        match (self.state, event) {
            (State::Boot, LinkEvent::TimerElapsed) => {
                self.state = State::InitCca;
                self.link.begin_cca(ctx);
            }
            (State::InitCca, LinkEvent::CcaComplete { idle })
            | (State::FrameCca, LinkEvent::CcaComplete { idle }) => {
                if idle {
                    self.arm_transmission(ctx);
                }
                self.frame(ctx);
            }
            (State::FrameGap, LinkEvent::TimerElapsed) => {
                self.state = State::FrameCca;
                self.link.begin_cca(ctx);
            }
            (State::Transmitting, LinkEvent::TxComplete { successful }) => {
                if !successful {
                    // The collision outcome truncates the phase no
                    // matter where the loop is.
                    self.cycle = Cycle::Contending;
                }
                self.state = State::Settle;
                self.link.sleep(ctx, self.link.times().idle_gap());
            }
            (State::Settle, LinkEvent::TimerElapsed) => {
                self.state = State::SettleCca;
                self.link.begin_cca(ctx);
            }
            (State::SettleCca, LinkEvent::CcaComplete { idle }) => {
                match self.cycle {
                    Cycle::Transmitting(n) if idle => {
                        if n <= 1 {
                            // Phase ran its full length; draw the muted
                            // phase that follows.
                            let drawn = ctx.draw(self.muted_periods);
                            debug!(
                                station = %self.link.name(),
                                drawn,
                                "transmission phase finished, arming muted phase"
                            );
                            self.cycle = Cycle::Muted(drawn);
                        } else {
                            self.cycle = Cycle::Transmitting(n - 1);
                        }
                    }
                    _ => {
                        debug!(
                            station = %self.link.name(),
                            idle,
                            "leaving transmission phase early"
                        );
                        self.cycle = Cycle::Contending;
                    }
                }
                self.frame(ctx);
            }
            (State::MutedFrame, LinkEvent::TimerElapsed) => {
                if let Cycle::Muted(n) = self.cycle {
                    debug!(station = %self.link.name(), from = n, "decrementing muted period counter");
                    self.cycle = Cycle::Muted(n - 1);
                }
                self.frame(ctx);
            }
            (State::FinalMuteGap, LinkEvent::TimerElapsed) => {
                self.state = State::FinalMuteCca;
                self.link.begin_cca(ctx);
            }
            (State::FinalMuteCca, LinkEvent::CcaComplete { idle }) => {
                // The muted phase is over; an idle channel arms the next
                // transmission phase without a contention frame.
                self.cycle = Cycle::Contending;
                if idle {
                    self.arm_transmission(ctx);
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
        self.cycle = Cycle::Contending;
    }

    fn stats(&self) -> TxStats {
        self.link.stats()
    }

    fn take_stats(&mut self) -> TxStats {
        self.link.take_stats()
    }
}
