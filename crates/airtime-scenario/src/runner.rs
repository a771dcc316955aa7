//! Builds station lineups and runs them group by group.

use tracing::info;

use airtime_core::StationId;
use airtime_engine::{Simulation, Station};
use airtime_stations::{FixedMutingFbe, RandomMutingFbe, StandardFbe, StationConfig};

use crate::report::{RunRecord, ScenarioReport};
use crate::scenario::{PolicySpec, Scenario, ScenarioError, StationSpec};

/// Execute a scenario: every group, `repetitions` times each.
///
/// Stations are constructed once per group and re-run after a reset
/// between trials, so only their counters restart; the group's random
/// source keeps advancing so repeated trials draw fresh randomness.
///
/// # Errors
///
/// Returns [`ScenarioError`] when validation or station construction
/// fails, or the engine rejects a group. Nothing is simulated in that
/// case.
pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioReport, ScenarioError> {
    scenario.validate()?;

    let mut records = Vec::new();
    for (group, specs) in scenario.groups.iter().enumerate() {
        let mut stations = build_group(group, specs)?;
        let mut sim = Simulation::new(scenario.horizon, scenario.seed ^ group as u64);
        info!(group, stations = stations.len(), "running group");

        for repetition in 0..scenario.repetitions {
            sim.run(&mut stations)?;
            for station in stations.iter_mut() {
                records.push(RunRecord {
                    group,
                    repetition,
                    station: station.name().to_string(),
                    kind: station.kind(),
                    stats: station.take_stats(),
                });
            }
            sim.reset();
            for station in stations.iter_mut() {
                station.reset();
            }
        }
    }
    Ok(ScenarioReport::new(records))
}

fn build_group(
    group: usize,
    specs: &[StationSpec],
) -> Result<Vec<Box<dyn Station>>, ScenarioError> {
    specs
        .iter()
        .enumerate()
        .map(|(position, spec)| build_station(group, position, spec))
        .collect()
}

fn build_station(
    group: usize,
    position: usize,
    spec: &StationSpec,
) -> Result<Box<dyn Station>, ScenarioError> {
    let config = StationConfig {
        id: StationId(position as u32),
        name: spec.name.clone(),
        times: spec.times,
        offset: spec.offset,
    };
    Ok(match spec.policy {
        PolicySpec::Standard => Box::new(StandardFbe::new(config)),
        PolicySpec::FixedMuting { muted_periods } => {
            Box::new(FixedMutingFbe::new(config, muted_periods))
        }
        PolicySpec::RandomMuting {
            transmission_periods,
            muted_periods,
        } => Box::new(
            RandomMutingFbe::new(config, transmission_periods, muted_periods).map_err(
                |source| ScenarioError::Station {
                    group,
                    name: spec.name.clone(),
                    source,
                },
            )?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airtime_core::{FbeTimes, SimTime};

    fn micros(v: u64) -> SimTime {
        SimTime::from_micros(v)
    }

    fn nominal_times() -> FbeTimes {
        FbeTimes::new(micros(9), micros(1000), micros(991)).unwrap()
    }

    fn spec(name: &str, offset: u64, policy: PolicySpec) -> StationSpec {
        StationSpec {
            name: name.into(),
            times: nominal_times(),
            offset: micros(offset),
            policy,
        }
    }

    #[test]
    fn repetitions_produce_identical_records_for_deterministic_policies() {
        let scenario = Scenario {
            repetitions: 3,
            horizon: micros(10_000),
            seed: 1,
            groups: vec![vec![
                spec("std", 0, PolicySpec::Standard),
                spec("fixed", 500, PolicySpec::FixedMuting { muted_periods: 2 }),
            ]],
        };
        let report = run_scenario(&scenario).unwrap();

        // Two stations, three repetitions each.
        assert_eq!(report.records().len(), 6);
        let std_records: Vec<_> = report
            .records()
            .iter()
            .filter(|r| r.station == "std")
            .collect();
        assert_eq!(std_records.len(), 3);
        assert!(std_records.iter().all(|r| r.stats == std_records[0].stats));
        assert!(std_records.iter().all(|r| r.stats.failures == 0));
        assert_eq!(report.totals(0, "std").successes, 30);
    }

    #[test]
    fn groups_are_independent_lineups() {
        // Group 0 holds one lone station; group 1 holds two aligned
        // stations that collide every frame. Their records never mix.
        let scenario = Scenario {
            repetitions: 2,
            horizon: micros(5_000),
            seed: 9,
            groups: vec![
                vec![spec("solo", 0, PolicySpec::Standard)],
                vec![
                    spec("left", 0, PolicySpec::Standard),
                    spec("right", 0, PolicySpec::Standard),
                ],
            ],
        };
        let report = run_scenario(&scenario).unwrap();

        let solo = report.totals(0, "solo");
        assert!(solo.successes > 0);
        assert_eq!(solo.failures, 0);

        for name in ["left", "right"] {
            let totals = report.totals(1, name);
            assert_eq!(totals.successes, 0);
            assert!(totals.failures > 0);
        }
    }

    #[test]
    fn same_scenario_reproduces_the_same_report() {
        let scenario = Scenario {
            repetitions: 2,
            horizon: micros(30_000),
            seed: 17,
            groups: vec![vec![
                spec("std", 0, PolicySpec::Standard),
                spec(
                    "rand",
                    250,
                    PolicySpec::RandomMuting {
                        transmission_periods: 3,
                        muted_periods: 4,
                    },
                ),
            ]],
        };
        let first = run_scenario(&scenario).unwrap();
        let second = run_scenario(&scenario).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_station_parameters_surface_before_any_run() {
        let scenario = Scenario {
            repetitions: 1,
            horizon: micros(1_000),
            seed: 0,
            groups: vec![vec![spec(
                "bad",
                0,
                PolicySpec::RandomMuting {
                    transmission_periods: 0,
                    muted_periods: 1,
                },
            )]],
        };
        match run_scenario(&scenario) {
            Err(ScenarioError::Station { name, .. }) => assert_eq!(name, "bad"),
            other => panic!("expected Station error, got {other:?}"),
        }
    }
}
