//! Scenario descriptions and the repetition runner.
//!
//! A [`Scenario`] describes an experiment: a matrix of station groups,
//! how often each group is re-run, the simulation horizon, and the seed.
//! [`run_scenario`] executes every group for the requested repetitions,
//! resetting stations, channel and clock between trials, and returns a
//! [`ScenarioReport`] of per-repetition transmission statistics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod report;
pub mod runner;
pub mod scenario;

pub use report::{RunRecord, ScenarioReport, StationSummary};
pub use runner::run_scenario;
pub use scenario::{PolicySpec, Scenario, ScenarioError, StationSpec};
