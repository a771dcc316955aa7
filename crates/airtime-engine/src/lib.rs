//! Discrete-event engine and shared channel for the airtime simulator.
//!
//! Provides the deterministic event queue, the shared medium with
//! collision arbitration, the seeded random source, and the
//! [`Simulation`] runner that drives [`Station`] state machines forward
//! in virtual time. Scheduling is single-threaded and cooperative: one
//! event is dispatched at a time, and all channel mutation happens
//! inside the dispatching turn before the clock advances.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod event_queue;
pub mod rng;
pub mod sim;
pub mod station;

pub use channel::{Airtime, Channel};
pub use event_queue::{EventKey, EventPayload, EventQueue, ScheduledEvent};
pub use rng::SimRng;
pub use sim::{RunError, RunMetrics, Simulation};
pub use station::{Context, Station};
