use crate::control_system::signal_io::{Actuator, ControllerIo};
use crate::control_system::timing_policy::TimingPolicy;
use crate::simulation_engine::clock::Clock;
use crate::simulation_engine::intersections::{Aspect, IntersectionState, LaneId};
use std::time::Duration;

/// Interrupts normal sequencing to give pedestrians a crossing on one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedestrianHandler {
    yellow: Duration,
    blinks: u32,
    blink_interval: Duration,
    indication: Duration,
}

impl PedestrianHandler {
    pub fn new(policy: &TimingPolicy) -> Self {
        Self {
            yellow: policy.yellow(),
            blinks: (policy.blink_half_cycles() / 2).max(1),
            blink_interval: policy.blink_interval(),
            indication: policy.pedestrian(),
        }
    }

    /// Total length of the crossing indication, always PEDESTRIAN_TIME.
    pub fn indication_time(&self) -> Duration {
        self.indication
    }

    /// The closing half-cycle takes up whatever the even split rounded away.
    fn final_half_cycle(&self) -> Duration {
        let earlier = self.blink_interval * (self.blinks * 2 - 1);
        self.indication.saturating_sub(earlier)
    }

    /// Fixed, non-preemptible sequence: stop any green through yellow, force
    /// all red, blink the requesting lane's red head, then clear the request.
    pub fn serve<C: Clock, A: Actuator>(
        &self,
        state: &mut IntersectionState,
        io: &mut ControllerIo<C, A>,
        lane: LaneId,
    ) {
        log::info!("Handling pedestrian crossing at lane {}", lane);

        for stopped in io.stop_green_lanes(state, self.yellow) {
            io.show(stopped, Aspect::Dark);
        }

        io.all_red(state);

        // Lane stays logically RED while its head blinks.
        for blink in 1..=self.blinks {
            io.show(lane, Aspect::Dark);
            io.hold(self.blink_interval);
            io.show(lane, Aspect::Red);
            if blink == self.blinks {
                io.hold(self.final_half_cycle());
            } else {
                io.hold(self.blink_interval);
            }
        }

        state.lane_mut(lane).pedestrian_request = false;
        log::info!("Pedestrian crossing complete at lane {}", lane);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::signal_trace::SignalTrace;
    use crate::simulation_engine::clock::ManualClock;
    use crate::simulation_engine::intersections::SignalState;

    fn setup() -> (PedestrianHandler, ControllerIo<ManualClock, SignalTrace>, IntersectionState) {
        (
            PedestrianHandler::new(&TimingPolicy::default()),
            ControllerIo::new(ManualClock::new(), SignalTrace::new()),
            IntersectionState::new(),
        )
    }

    #[test]
    fn test_green_lane_goes_through_yellow_then_blinks() {
        let (handler, mut io, mut state) = setup();
        let lane = LaneId::ALL[1];
        state.lane_mut(lane).state = SignalState::Green;
        state.lane_mut(lane).pedestrian_request = true;

        handler.serve(&mut state, &mut io, lane);

        let events = io.actuator.events();
        assert_eq!((events[0].at_ms, events[0].aspect), (0, Aspect::Yellow));
        assert_eq!((events[1].at_ms, events[1].aspect), (2000, Aspect::Dark));
        assert_eq!((events[2].at_ms, events[2].aspect), (2000, Aspect::Red));

        let blinks: Vec<_> = events[3..].iter().map(|e| (e.at_ms, e.aspect)).collect();
        let mut expected = Vec::new();
        for i in 0..5u64 {
            expected.push((2000 + i * 1000, Aspect::Dark));
            expected.push((2500 + i * 1000, Aspect::Red));
        }
        assert_eq!(blinks, expected);
        assert!(events.iter().all(|e| e.lane == lane));

        assert_eq!(io.now(), Duration::from_millis(7000));
        assert!(state.all_red());
        assert!(!state.lane(lane).pedestrian_request);
    }

    #[test]
    fn test_red_lane_skips_yellow() {
        let (handler, mut io, mut state) = setup();
        let lane = LaneId::ALL[3];
        state.lane_mut(lane).pedestrian_request = true;

        handler.serve(&mut state, &mut io, lane);

        assert_eq!(io.actuator.events().len(), 10);
        assert_eq!(io.actuator.events()[0].aspect, Aspect::Dark);
        assert_eq!(io.now(), handler.indication_time());
        assert!(!state.lane(lane).pedestrian_request);
    }

    #[test]
    fn test_indication_tied_to_pedestrian_time() {
        let handler = PedestrianHandler::new(&TimingPolicy {
            pedestrian_ms: 6000,
            pedestrian_blink_count: 3,
            ..TimingPolicy::default()
        });
        assert_eq!(handler.indication_time(), Duration::from_millis(6000));
    }

    #[test]
    fn test_uneven_split_still_fills_pedestrian_time() {
        let handler = PedestrianHandler::new(&TimingPolicy {
            pedestrian_ms: 5000,
            pedestrian_blink_count: 3,
            ..TimingPolicy::default()
        });
        let mut io = ControllerIo::new(ManualClock::new(), SignalTrace::new());
        let mut state = IntersectionState::new();
        let lane = LaneId::ALL[0];
        state.lane_mut(lane).pedestrian_request = true;

        handler.serve(&mut state, &mut io, lane);

        assert_eq!(io.now(), Duration::from_millis(5000));
        assert_eq!(io.actuator.events().len(), 6);
    }

    #[test]
    fn test_huge_blink_count_does_not_overflow() {
        let handler = PedestrianHandler::new(&TimingPolicy {
            pedestrian_blink_count: u32::MAX,
            ..TimingPolicy::default()
        });
        assert_eq!(handler.indication_time(), Duration::from_millis(5000));
        assert!(handler.final_half_cycle() <= handler.indication_time());
    }

    #[test]
    fn test_other_lanes_untouched_flags() {
        let (handler, mut io, mut state) = setup();
        state.lanes[0].pedestrian_request = true;
        state.lanes[2].pedestrian_request = true;

        handler.serve(&mut state, &mut io, LaneId::ALL[0]);

        assert!(!state.lanes[0].pedestrian_request);
        assert!(state.lanes[2].pedestrian_request);
    }
}
