//! Plain frame-based access without muting.

use tracing::info;

use airtime_core::{StationId, StationKind, TxStats};
use airtime_engine::{Context, EventPayload, Station};

use crate::link::{Link, LinkEvent, StationConfig};

/// The reference policy: every frame whose closing CCA found the channel
/// idle is used for transmission.
///
/// After the initial offset and one CCA, the station alternates between
/// two logical states. Listening: wait out the frame (`ffp - cca`) and
/// sense again. Transmitting: occupy the frame's remaining time, wait
/// `idle_time - cca`, and close the frame with the next CCA.
#[derive(Debug)]
pub struct StandardFbe {
    link: Link,
}

impl StandardFbe {
    /// Build a station from the shared configuration.
    pub fn new(config: StationConfig) -> Self {
        Self {
            link: Link::new(config),
        }
    }
}

impl Station for StandardFbe {
    fn id(&self) -> StationId {
        self.link.id()
    }

    fn name(&self) -> &str {
        self.link.name()
    }

    fn kind(&self) -> StationKind {
        StationKind::Standard
    }

    fn start(&mut self, ctx: &mut Context<'_>) {
        info!(at = %ctx.now(), station = %self.link.name(), "starting station");
        self.link.sleep(ctx, self.link.offset());
    }

    fn on_event(&mut self, ctx: &mut Context<'_>, payload: EventPayload) {
        let Some(event) = self.link.absorb(ctx, payload) else {
            return;
        };
        let times = self.link.times();
        match event {
            // Every timer in this policy (offset, frame gap, idle gap)
            // ends at the next sensing window.
            LinkEvent::TimerElapsed => self.link.begin_cca(ctx),
            LinkEvent::CcaComplete { idle: true } => self.link.begin_transmission(ctx),
            LinkEvent::CcaComplete { idle: false } => self.link.sleep(ctx, times.frame_gap()),
            LinkEvent::TxComplete { .. } => self.link.sleep(ctx, times.idle_gap()),
        }
    }

    fn reset(&mut self) {
        self.link.reset();
    }

    fn stats(&self) -> TxStats {
        self.link.stats()
    }

    fn take_stats(&mut self) -> TxStats {
        self.link.take_stats()
    }
}
