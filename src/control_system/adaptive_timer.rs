use crate::control_system::timing_policy::TimingPolicy;
use crate::global_variables::DENSITY_WEIGHT_MAX;
use crate::simulation_engine::intersections::DensityWeight;
use std::time::Duration;

/// Maps a lane's density weight onto a green duration within the policy bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveTimer {
    min_green_ms: u64,
    max_green_ms: u64,
}

impl AdaptiveTimer {
    pub fn new(policy: &TimingPolicy) -> Self {
        Self {
            min_green_ms: policy.min_green_ms,
            max_green_ms: policy.max_green_ms,
        }
    }

    /// MIN_GREEN plus the weight's linear share of the adjustable range,
    /// clamped into [MIN_GREEN, MAX_GREEN].
    pub fn green_time(&self, weight: DensityWeight) -> Duration {
        let span = self.max_green_ms.saturating_sub(self.min_green_ms);
        // Widened so a huge span cannot overflow; the share never exceeds `span`.
        let additional = (weight.value() as u128 * span as u128 / DENSITY_WEIGHT_MAX as u128) as u64;
        let total = self.min_green_ms + additional;
        Duration::from_millis(total.clamp(self.min_green_ms, self.max_green_ms.max(self.min_green_ms)))
    }
}
