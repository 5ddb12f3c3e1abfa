use crate::errors::{ConfigError, ConfigResult};
use crate::global_variables::{
    ALL_RED_TIME, BASE_GREEN_TIME, EMERGENCY_COOLDOWN, EMERGENCY_HOLD, EMERGENCY_LANE,
    MAX_GREEN_TIME, MIN_GREEN_TIME, PEDESTRIAN_BLINK_COUNT, PEDESTRIAN_TIME, YELLOW_TIME,
};
use crate::simulation_engine::intersections::LaneId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest blink count whose on/off half-cycles still fit in a `u32`.
pub const MAX_PEDESTRIAN_BLINK_COUNT: u32 = u32::MAX / 2;

/// Immutable timing bounds for every phase. All times are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingPolicy {
    pub base_green_ms: u64,
    pub min_green_ms: u64,
    pub max_green_ms: u64,
    pub yellow_ms: u64,
    /// Safety buffer with every lane red after each lane's cycle.
    pub all_red_ms: u64,
    /// Total length of the crossing indication; split evenly over the blinks.
    pub pedestrian_ms: u64,
    pub pedestrian_blink_count: u32,
    pub emergency_cooldown_ms: u64,
    pub emergency_hold_ms: u64,
    pub emergency_lane: u8,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            base_green_ms: BASE_GREEN_TIME,
            min_green_ms: MIN_GREEN_TIME,
            max_green_ms: MAX_GREEN_TIME,
            yellow_ms: YELLOW_TIME,
            all_red_ms: ALL_RED_TIME,
            pedestrian_ms: PEDESTRIAN_TIME,
            pedestrian_blink_count: PEDESTRIAN_BLINK_COUNT,
            emergency_cooldown_ms: EMERGENCY_COOLDOWN,
            emergency_hold_ms: EMERGENCY_HOLD,
            emergency_lane: EMERGENCY_LANE,
        }
    }
}

impl TimingPolicy {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_green_ms == 0 {
            return Err(ConfigError::Invalid("min_green_ms must be positive".into()));
        }
        if self.min_green_ms > self.max_green_ms {
            return Err(ConfigError::Invalid(format!(
                "min_green_ms ({}) exceeds max_green_ms ({})",
                self.min_green_ms, self.max_green_ms
            )));
        }
        if !(self.min_green_ms..=self.max_green_ms).contains(&self.base_green_ms) {
            return Err(ConfigError::Invalid(format!(
                "base_green_ms ({}) outside [{}, {}]",
                self.base_green_ms, self.min_green_ms, self.max_green_ms
            )));
        }
        if self.yellow_ms == 0 {
            return Err(ConfigError::Invalid("yellow_ms must be positive".into()));
        }
        if self.pedestrian_blink_count == 0 {
            return Err(ConfigError::Invalid(
                "pedestrian_blink_count must be positive".into(),
            ));
        }
        if self.pedestrian_blink_count > MAX_PEDESTRIAN_BLINK_COUNT {
            return Err(ConfigError::Invalid(format!(
                "pedestrian_blink_count ({}) exceeds {}",
                self.pedestrian_blink_count, MAX_PEDESTRIAN_BLINK_COUNT
            )));
        }
        if LaneId::new(self.emergency_lane).is_none() {
            return Err(ConfigError::Invalid(format!(
                "emergency_lane {} is not a lane index 0..=3",
                self.emergency_lane
            )));
        }
        Ok(())
    }

    pub fn yellow(&self) -> Duration {
        Duration::from_millis(self.yellow_ms)
    }

    pub fn all_red(&self) -> Duration {
        Duration::from_millis(self.all_red_ms)
    }

    pub fn pedestrian(&self) -> Duration {
        Duration::from_millis(self.pedestrian_ms)
    }

    /// Number of on/off half-cycles in the crossing indication.
    pub fn blink_half_cycles(&self) -> u32 {
        self.pedestrian_blink_count.max(1).saturating_mul(2)
    }

    /// Half-cycle of the crossing blink, rounded down to the nanosecond.
    pub fn blink_interval(&self) -> Duration {
        self.pedestrian() / self.blink_half_cycles()
    }

    pub fn emergency_cooldown(&self) -> Duration {
        Duration::from_millis(self.emergency_cooldown_ms)
    }

    pub fn emergency_hold(&self) -> Duration {
        Duration::from_millis(self.emergency_hold_ms)
    }

    /// Falls back to lane 0 for an unvalidated out-of-range index.
    pub fn priority_lane(&self) -> LaneId {
        LaneId::new(self.emergency_lane).unwrap_or(LaneId::ALL[0])
    }
}
