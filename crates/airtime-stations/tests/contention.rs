//! Cross-variant contention scenarios on one shared channel.

use airtime_core::{FbeTimes, SimTime, StationId, TxStats};
use airtime_engine::{Airtime, Simulation, Station};
use airtime_stations::{FixedMutingFbe, RandomMutingFbe, StandardFbe, StationConfig};

fn micros(v: u64) -> SimTime {
    SimTime::from_micros(v)
}

fn nominal_times() -> FbeTimes {
    FbeTimes::new(micros(9), micros(1000), micros(991)).unwrap()
}

fn config(id: u32, name: &str, offset: u64) -> StationConfig {
    StationConfig {
        id: StationId(id),
        name: name.into(),
        times: nominal_times(),
        offset: micros(offset),
    }
}

/// One of each variant, offset so their frames interleave without ever
/// overlapping on air.
fn mixed_lineup() -> Vec<Box<dyn Station>> {
    vec![
        Box::new(StandardFbe::new(config(0, "std", 0))),
        Box::new(RandomMutingFbe::new(config(1, "rand", 250), 3, 4).unwrap()),
        Box::new(FixedMutingFbe::new(config(2, "fixed", 500), 2)),
    ]
}

#[test]
fn mixed_lineup_shares_the_channel_without_collisions() {
    let mut sim = Simulation::new(micros(10_000), 42);
    let mut stations = mixed_lineup();
    sim.run(&mut stations).unwrap();

    assert!(sim.channel().history().iter().all(|a| !a.collided));

    // Standard transmits every frame: starts at 9, 1009, ..., 9009.
    let std_stats = stations[0].stats();
    assert_eq!(std_stats.successes, 10);
    assert_eq!(std_stats.failures, 0);

    // Fixed muting with M=2 transmits every third frame: 518, 3518,
    // 6518, 9518.
    let fixed_starts: Vec<SimTime> = sim
        .channel()
        .history()
        .iter()
        .filter(|a| a.station == StationId(2))
        .map(|a| a.started_at)
        .collect();
    assert_eq!(fixed_starts, [518, 3518, 6518, 9518].map(micros).to_vec());

    // Random muting transmits at 259 + k*1000 whenever its phase allows.
    let rand_stats = stations[1].stats();
    assert!(rand_stats.successes > 0);
    assert_eq!(rand_stats.failures, 0);
    for airing in sim
        .channel()
        .history()
        .iter()
        .filter(|a| a.station == StationId(1))
    {
        assert_eq!((airing.started_at - micros(259)).as_micros() % 1000, 0);
    }
}

#[test]
fn identical_seeds_reproduce_runs_exactly() {
    let run = || -> (Vec<Airtime>, Vec<TxStats>) {
        let mut sim = Simulation::new(micros(25_000), 7);
        let mut stations = mixed_lineup();
        sim.run(&mut stations).unwrap();
        (
            sim.channel().history().to_vec(),
            stations.iter().map(|s| s.stats()).collect(),
        )
    };

    let (history_a, stats_a) = run();
    let (history_b, stats_b) = run();
    assert_eq!(history_a, history_b);
    assert_eq!(stats_a, stats_b);
    assert!(!history_a.is_empty());
}

#[test]
fn repetition_reset_leaks_no_state_for_deterministic_variants() {
    // Standard and fixed muting draw no randomness, so a reset
    // repetition reproduces the first run event for event even though
    // the simulation's random source has advanced.
    let mut sim = Simulation::new(micros(12_000), 5);
    let mut stations: Vec<Box<dyn Station>> = vec![
        Box::new(StandardFbe::new(config(0, "std", 0))),
        Box::new(FixedMutingFbe::new(config(1, "fixed", 500), 3)),
    ];
    sim.run(&mut stations).unwrap();
    let first = sim.channel().history().to_vec();
    let first_stats: Vec<TxStats> = stations.iter_mut().map(|s| s.take_stats()).collect();

    sim.reset();
    for s in stations.iter_mut() {
        s.reset();
    }
    sim.run(&mut stations).unwrap();

    assert_eq!(sim.channel().history(), first.as_slice());
    let second_stats: Vec<TxStats> = stations.iter().map(|s| s.stats()).collect();
    assert_eq!(second_stats, first_stats);
}
