//! Run records and the aggregated scenario report.

use std::fmt;

use airtime_core::{StationKind, TxStats};

/// Transmission statistics of one station in one repetition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRecord {
    /// Index of the run group.
    pub group: usize,
    /// Repetition number, starting at zero.
    pub repetition: u32,
    /// The station's name.
    pub station: String,
    /// The station's variant tag.
    pub kind: StationKind,
    /// Harvested success/failure counters.
    pub stats: TxStats,
}

/// Per-station aggregate over all repetitions of its group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationSummary {
    /// Index of the run group.
    pub group: usize,
    /// The station's name.
    pub station: String,
    /// The station's variant tag.
    pub kind: StationKind,
    /// Number of repetitions aggregated.
    pub repetitions: u32,
    /// Summed counters across those repetitions.
    pub totals: TxStats,
}

/// Everything a scenario run produced, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    records: Vec<RunRecord>,
}

impl ScenarioReport {
    /// Wrap the records of a completed scenario.
    pub fn new(records: Vec<RunRecord>) -> Self {
        Self { records }
    }

    /// Every per-repetition record, in execution order.
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Summed counters for one station of one group.
    pub fn totals(&self, group: usize, station: &str) -> TxStats {
        self.records
            .iter()
            .filter(|r| r.group == group && r.station == station)
            .fold(TxStats::default(), |acc, r| acc + r.stats)
    }

    /// Aggregate the records per station, in first-appearance order.
    pub fn summaries(&self) -> Vec<StationSummary> {
        let mut summaries: Vec<StationSummary> = Vec::new();
        for record in &self.records {
            match summaries
                .iter_mut()
                .find(|s| s.group == record.group && s.station == record.station)
            {
                Some(summary) => {
                    summary.repetitions += 1;
                    summary.totals += record.stats;
                }
                None => summaries.push(StationSummary {
                    group: record.group,
                    station: record.station.clone(),
                    kind: record.kind,
                    repetitions: 1,
                    totals: record.stats,
                }),
            }
        }
        summaries
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<5} {:<16} {:<18} {:>4} {:>10} {:>10}",
            "group", "station", "kind", "reps", "successes", "failures"
        )?;
        for s in self.summaries() {
            writeln!(
                f,
                "{:<5} {:<16} {:<18} {:>4} {:>10} {:>10}",
                s.group,
                s.station,
                s.kind.as_str(),
                s.repetitions,
                s.totals.successes,
                s.totals.failures
            )?;
        }
        Ok(())
    }
}
