use crate::global_variables::{DENSITY_WEIGHT_MAX, LANE_COUNT, RAW_DENSITY_MAX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifies one of the four approaches, always in 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LaneId(u8);

impl LaneId {
    /// Evaluation order used by the arbiter for every normal cycle.
    pub const ALL: [LaneId; LANE_COUNT] = [LaneId(0), LaneId(1), LaneId(2), LaneId(3)];

    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < LANE_COUNT {
            Some(LaneId(index))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for LaneId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LaneId::new(value).ok_or_else(|| format!("lane index {} out of range 0..=3", value))
    }
}

impl From<LaneId> for u8 {
    fn from(lane: LaneId) -> u8 {
        lane.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical signal state held by a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

/// What a signal head physically shows. `Dark` covers the yellow-off step and
/// the blink-off half cycles of the pedestrian indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aspect {
    Green,
    Yellow,
    Red,
    Dark,
}

impl From<SignalState> for Aspect {
    fn from(state: SignalState) -> Self {
        match state {
            SignalState::Green => Aspect::Green,
            SignalState::Yellow => Aspect::Yellow,
            SignalState::Red => Aspect::Red,
        }
    }
}

/// Normalised traffic volume on a lane, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DensityWeight(u8);

impl DensityWeight {
    pub const MIN: DensityWeight = DensityWeight(0);
    pub const MAX: DensityWeight = DensityWeight(DENSITY_WEIGHT_MAX);

    /// Saturates anything above 100.
    pub fn new(weight: u8) -> Self {
        DensityWeight(weight.min(DENSITY_WEIGHT_MAX))
    }

    /// Maps a raw 0..=1023 detector reading linearly onto 0..=100.
    pub fn from_raw(raw: u16) -> Self {
        let raw = raw.min(RAW_DENSITY_MAX) as u32;
        let weight = raw * DENSITY_WEIGHT_MAX as u32 / RAW_DENSITY_MAX as u32;
        DensityWeight(weight as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for DensityWeight {
    fn from(weight: u8) -> Self {
        DensityWeight::new(weight)
    }
}

impl From<DensityWeight> for u8 {
    fn from(weight: DensityWeight) -> u8 {
        weight.0
    }
}

/// A single approach with its own signal head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    pub id: LaneId,
    pub state: SignalState,
    pub weight: DensityWeight,
    pub pedestrian_request: bool,
}

impl Lane {
    pub fn new(id: LaneId) -> Self {
        Self {
            id,
            state: SignalState::Red,
            weight: DensityWeight::MIN,
            pedestrian_request: false,
        }
    }
}

/// Emergency flag together with the monotonic reading taken at activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Normal,
    Emergency { activated_at: Duration },
}

/// The whole intersection: four lanes plus the current control mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionState {
    pub lanes: [Lane; LANE_COUNT],
    pub mode: ControlMode,
}

impl IntersectionState {
    /// Baseline at startup: all lanes RED, zero weights, nothing pending.
    pub fn new() -> Self {
        Self {
            lanes: LaneId::ALL.map(Lane::new),
            mode: ControlMode::Normal,
        }
    }

    pub fn lane(&self, id: LaneId) -> &Lane {
        &self.lanes[id.index()]
    }

    pub fn lane_mut(&mut self, id: LaneId) -> &mut Lane {
        &mut self.lanes[id.index()]
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self.mode, ControlMode::Emergency { .. })
    }

    pub fn green_lanes(&self) -> Vec<LaneId> {
        self.lanes
            .iter()
            .filter(|lane| lane.state == SignalState::Green)
            .map(|lane| lane.id)
            .collect()
    }

    pub fn all_red(&self) -> bool {
        self.lanes.iter().all(|lane| lane.state == SignalState::Red)
    }

    /// Logs an error if more than one lane shows green.
    pub fn check_conflicts(&self) -> bool {
        let green = self.green_lanes();
        if green.len() > 1 {
            log::error!("Signal conflict detected: lanes {:?} are green", green);
            return true;
        }
        false
    }
}

impl Default for IntersectionState {
    fn default() -> Self {
        Self::new()
    }
}
