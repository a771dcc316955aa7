//! Experiment descriptions and their validation.

use std::error::Error;
use std::fmt;

use airtime_core::{FbeTimes, SimTime};
use airtime_engine::RunError;
use airtime_stations::StationError;

/// Frame-level policy selection for one station.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicySpec {
    /// Plain FBE: transmit in every idle frame.
    Standard,
    /// Fixed cool-down of `muted_periods` frames after each transmission
    /// cycle (zero degenerates to the standard cadence).
    FixedMuting {
        /// Number of muted frames after each transmission cycle.
        muted_periods: u32,
    },
    /// Randomly drawn transmission and muting phases.
    RandomMuting {
        /// Upper bound of the transmission-phase draw (at least 1).
        transmission_periods: u32,
        /// Upper bound of the muted-phase draw (at least 1).
        muted_periods: u32,
    },
}

impl PolicySpec {
    /// Check the policy's own parameter constraints.
    fn validate(&self) -> Result<(), StationError> {
        match *self {
            Self::RandomMuting {
                transmission_periods,
                ..
            } if transmission_periods == 0 => Err(StationError::ZeroTransmissionPeriods),
            Self::RandomMuting { muted_periods, .. } if muted_periods == 0 => {
                Err(StationError::ZeroMutedPeriods)
            }
            _ => Ok(()),
        }
    }
}

/// One station in a run group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationSpec {
    /// Name used in logs and report rows. Unique within its group.
    pub name: String,
    /// Validated FBE timing parameters.
    pub times: FbeTimes,
    /// Initial desynchronization delay.
    pub offset: SimTime,
    /// The frame-level policy.
    pub policy: PolicySpec,
}

/// A complete experiment: a matrix of independent station groups, each
/// run `repetitions` times to the same horizon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    /// How many trials to run per group.
    pub repetitions: u32,
    /// The virtual-time horizon bounding every trial.
    pub horizon: SimTime,
    /// Seed for the per-group random sources (`seed ^ group_index`).
    pub seed: u64,
    /// The station groups. Each inner vector is one independent lineup.
    pub groups: Vec<Vec<StationSpec>>,
}

impl Scenario {
    /// Validate the whole description.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: zero repetitions or horizon,
    /// an empty matrix or group, duplicate station names within a
    /// group, or invalid policy parameters.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.repetitions == 0 {
            return Err(ScenarioError::ZeroRepetitions);
        }
        if self.horizon.is_zero() {
            return Err(ScenarioError::ZeroHorizon);
        }
        if self.groups.is_empty() {
            return Err(ScenarioError::NoGroups);
        }
        for (group, specs) in self.groups.iter().enumerate() {
            if specs.is_empty() {
                return Err(ScenarioError::EmptyGroup { group });
            }
            for (position, spec) in specs.iter().enumerate() {
                if specs[..position].iter().any(|s| s.name == spec.name) {
                    return Err(ScenarioError::DuplicateName {
                        group,
                        name: spec.name.clone(),
                    });
                }
                spec.policy
                    .validate()
                    .map_err(|source| ScenarioError::Station {
                        group,
                        name: spec.name.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

/// Errors from scenario validation or execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioError {
    /// `repetitions` is zero.
    ZeroRepetitions,
    /// The horizon is zero.
    ZeroHorizon,
    /// The scenario matrix has no groups.
    NoGroups,
    /// A group has no stations.
    EmptyGroup {
        /// Index of the empty group.
        group: usize,
    },
    /// Two stations in one group share a name.
    DuplicateName {
        /// Index of the offending group.
        group: usize,
        /// The duplicated name.
        name: String,
    },
    /// A station's policy parameters are invalid.
    Station {
        /// Index of the offending group.
        group: usize,
        /// Name of the offending station.
        name: String,
        /// The underlying constraint violation.
        source: StationError,
    },
    /// The engine rejected a run group.
    Engine(RunError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRepetitions => write!(f, "scenario needs at least one repetition"),
            Self::ZeroHorizon => write!(f, "scenario horizon must be positive"),
            Self::NoGroups => write!(f, "scenario matrix has no groups"),
            Self::EmptyGroup { group } => write!(f, "group {group} has no stations"),
            Self::DuplicateName { group, name } => {
                write!(f, "group {group} names '{name}' twice")
            }
            Self::Station {
                group,
                name,
                source,
            } => {
                write!(f, "station '{name}' in group {group}: {source}")
            }
            Self::Engine(e) => write!(f, "engine: {e}"),
        }
    }
}

impl Error for ScenarioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Station { source, .. } => Some(source),
            Self::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RunError> for ScenarioError {
    fn from(e: RunError) -> Self {
        Self::Engine(e)
    }
}
