//! Criterion benchmarks for full scenario runs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use airtime_core::{FbeTimes, SimTime};
use airtime_scenario::{run_scenario, PolicySpec, Scenario, StationSpec};

fn nominal_times() -> FbeTimes {
    FbeTimes::new(
        SimTime::from_micros(9),
        SimTime::from_micros(1000),
        SimTime::from_micros(991),
    )
    .unwrap()
}

fn station(name: &str, offset: u64, policy: PolicySpec) -> StationSpec {
    StationSpec {
        name: name.into(),
        times: nominal_times(),
        offset: SimTime::from_micros(offset),
        policy,
    }
}

/// Benchmark: 1000 frames, four stations, ten repetitions.
fn bench_mixed_group_10_reps(c: &mut Criterion) {
    let scenario = Scenario {
        repetitions: 10,
        horizon: SimTime::from_micros(1_000_000),
        seed: 42,
        groups: vec![vec![
            station("std-a", 0, PolicySpec::Standard),
            station("std-b", 100, PolicySpec::Standard),
            station(
                "rand",
                250,
                PolicySpec::RandomMuting {
                    transmission_periods: 3,
                    muted_periods: 4,
                },
            ),
            station("fixed", 500, PolicySpec::FixedMuting { muted_periods: 2 }),
        ]],
    };

    c.bench_function("mixed_group_10_reps", |b| {
        b.iter(|| {
            let report = run_scenario(black_box(&scenario)).unwrap();
            black_box(report);
        });
    });
}

/// Benchmark: two aligned stations colliding every frame for 1000 frames.
fn bench_collision_heavy_group(c: &mut Criterion) {
    let scenario = Scenario {
        repetitions: 1,
        horizon: SimTime::from_micros(1_000_000),
        seed: 7,
        groups: vec![vec![
            station("left", 0, PolicySpec::Standard),
            station("right", 0, PolicySpec::Standard),
        ]],
    };

    c.bench_function("collision_heavy_group", |b| {
        b.iter(|| {
            let report = run_scenario(black_box(&scenario)).unwrap();
            black_box(report);
        });
    });
}

criterion_group!(
    benches,
    bench_mixed_group_10_reps,
    bench_collision_heavy_group
);
criterion_main!(benches);
