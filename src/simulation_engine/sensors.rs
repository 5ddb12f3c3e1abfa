use crate::global_variables::{LANE_COUNT, RAW_DENSITY_MAX};
use crate::simulation_engine::intersections::DensityWeight;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// One lane's reading for a control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaneSample {
    pub weight: DensityWeight,
    pub pedestrian_request: bool,
}

/// Detector inputs consulted by the arbiter once per cycle.
pub trait Sensor {
    fn emergency_present(&mut self) -> bool;

    /// Density and pedestrian inputs for lanes 0..=3, in lane order.
    fn sample_lanes(&mut self) -> [LaneSample; LANE_COUNT];
}

/// A full set of inputs for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorFrame {
    pub emergency: bool,
    pub lanes: [LaneSample; LANE_COUNT],
}

impl SensorFrame {
    pub fn quiet() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: [u8; LANE_COUNT]) -> Self {
        let mut frame = Self::default();
        for (sample, weight) in frame.lanes.iter_mut().zip(weights) {
            sample.weight = DensityWeight::new(weight);
        }
        frame
    }

    pub fn with_pedestrian(mut self, lane: usize) -> Self {
        if let Some(sample) = self.lanes.get_mut(lane) {
            sample.pedestrian_request = true;
        }
        self
    }

    pub fn with_emergency(mut self) -> Self {
        self.emergency = true;
        self
    }
}

/// Replays frames in order. Once the script runs out every cycle reads as quiet.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSensor {
    frames: VecDeque<SensorFrame>,
    current: SensorFrame,
}

impl ScriptedSensor {
    pub fn new(frames: impl IntoIterator<Item = SensorFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current: SensorFrame::quiet(),
        }
    }
}

impl Sensor for ScriptedSensor {
    // The emergency check opens every cycle, so it is the one that advances the script.
    fn emergency_present(&mut self) -> bool {
        self.current = self.frames.pop_front().unwrap_or_else(SensorFrame::quiet);
        self.current.emergency
    }

    fn sample_lanes(&mut self) -> [LaneSample; LANE_COUNT] {
        self.current.lanes
    }
}

/// Probabilities driving `RandomSensor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficProfile {
    pub pedestrian_probability: f64,
    pub emergency_probability: f64,
}

/// Random detector readings: raw 0..=1023 densities plus Bernoulli events.
#[derive(Debug, Clone)]
pub struct RandomSensor {
    rng: SmallRng,
    profile: TrafficProfile,
}

impl RandomSensor {
    pub fn new(seed: u64, profile: TrafficProfile) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            profile,
        }
    }
}

impl Sensor for RandomSensor {
    fn emergency_present(&mut self) -> bool {
        self.rng
            .random_bool(self.profile.emergency_probability.clamp(0.0, 1.0))
    }

    fn sample_lanes(&mut self) -> [LaneSample; LANE_COUNT] {
        let pedestrian_probability = self.profile.pedestrian_probability.clamp(0.0, 1.0);
        std::array::from_fn(|_| {
            let raw = self.rng.random_range(0..=RAW_DENSITY_MAX);
            LaneSample {
                weight: DensityWeight::from_raw(raw),
                pedestrian_request: self.rng.random_bool(pedestrian_probability),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_sensor_replays_then_goes_quiet() {
        let mut sensor = ScriptedSensor::new(vec![
            SensorFrame::with_weights([10, 20, 30, 40]).with_pedestrian(2),
            SensorFrame::quiet().with_emergency(),
        ]);

        assert!(!sensor.emergency_present());
        let lanes = sensor.sample_lanes();
        assert_eq!(lanes[3].weight.value(), 40);
        assert!(lanes[2].pedestrian_request);
        assert!(!lanes[0].pedestrian_request);

        assert!(sensor.emergency_present());
        assert!(!sensor.emergency_present());
        assert_eq!(sensor.sample_lanes(), [LaneSample::default(); LANE_COUNT]);
    }

    #[test]
    fn test_random_sensor_is_deterministic_per_seed() {
        let profile = TrafficProfile {
            pedestrian_probability: 0.3,
            emergency_probability: 0.1,
        };
        let mut a = RandomSensor::new(7, profile);
        let mut b = RandomSensor::new(7, profile);
        for _ in 0..20 {
            assert_eq!(a.emergency_present(), b.emergency_present());
            assert_eq!(a.sample_lanes(), b.sample_lanes());
        }
    }

    #[test]
    fn test_random_sensor_weights_in_range() {
        let mut sensor = RandomSensor::new(
            3,
            TrafficProfile {
                pedestrian_probability: 0.0,
                emergency_probability: 0.0,
            },
        );
        for _ in 0..100 {
            assert!(!sensor.emergency_present());
            for sample in sensor.sample_lanes() {
                assert!(sample.weight <= DensityWeight::MAX);
                assert!(!sample.pedestrian_request);
            }
        }
    }
}
