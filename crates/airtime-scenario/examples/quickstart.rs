//! Airtime quickstart: a complete, minimal experiment from scratch.
//!
//! Demonstrates:
//!   1. Validating FBE timing parameters
//!   2. Describing a mixed station lineup
//!   3. Running a scenario with repetitions
//!   4. Reading per-repetition records and the aggregated report
//!
//! Run with:
//!   cargo run --example quickstart

use airtime_core::{FbeTimes, SimTime};
use airtime_scenario::{run_scenario, PolicySpec, Scenario, StationSpec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log the station transitions to stderr; tune with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Airtime Quickstart ===\n");

    // 1. Timing: 1 ms frames, 9 us sensing, 991 us idle window.
    let times = FbeTimes::new(
        SimTime::from_micros(9),
        SimTime::from_micros(1000),
        SimTime::from_micros(991),
    )?;
    println!(
        "Timing: ffp={}, cca={}, idle={}, on-air per frame={}",
        times.ffp(),
        times.cca(),
        times.idle_time(),
        times.transmission_time()
    );

    // 2. One lineup: each variant offset so their frames interleave.
    let station = |name: &str, offset: u64, policy: PolicySpec| StationSpec {
        name: name.into(),
        times,
        offset: SimTime::from_micros(offset),
        policy,
    };
    let scenario = Scenario {
        repetitions: 5,
        horizon: SimTime::from_micros(1_000_000),
        seed: 42,
        groups: vec![vec![
            station("greedy", 0, PolicySpec::Standard),
            station(
                "polite",
                250,
                PolicySpec::RandomMuting {
                    transmission_periods: 3,
                    muted_periods: 4,
                },
            ),
            station("steady", 500, PolicySpec::FixedMuting { muted_periods: 2 }),
        ]],
    };
    println!(
        "Scenario: {} group(s), {} repetitions, horizon {}\n",
        scenario.groups.len(),
        scenario.repetitions,
        scenario.horizon
    );

    // 3. Run.
    let report = run_scenario(&scenario)?;

    // 4. Inspect a few records, then print the aggregate table.
    for record in report.records().iter().take(3) {
        println!(
            "rep {} {:<8} {:>6} ok {:>4} lost",
            record.repetition, record.station, record.stats.successes, record.stats.failures
        );
    }
    println!("\n{report}");

    Ok(())
}
