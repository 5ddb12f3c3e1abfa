use crate::control_system::signal_io::{Actuator, ControllerIo};
use crate::control_system::timing_policy::TimingPolicy;
use crate::simulation_engine::clock::Clock;
use crate::simulation_engine::intersections::{IntersectionState, LaneId, SignalState};
use std::time::Duration;

/// Runs one lane through GREEN -> YELLOW -> RED followed by the all-red buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSequencer {
    yellow: Duration,
    all_red: Duration,
}

impl PhaseSequencer {
    pub fn new(policy: &TimingPolicy) -> Self {
        Self {
            yellow: policy.yellow(),
            all_red: policy.all_red(),
        }
    }

    /// Blocks for the whole sequence; there is no early exit once started.
    pub fn run<C: Clock, A: Actuator>(
        &self,
        state: &mut IntersectionState,
        io: &mut ControllerIo<C, A>,
        lane: LaneId,
        green: Duration,
    ) {
        // Every other head stays red while this lane is served.
        if !state.all_red() {
            io.stop_green_lanes(state, self.yellow);
            io.all_red(state);
        }

        io.set_signal(state, lane, SignalState::Green);
        io.hold(green);

        io.set_signal(state, lane, SignalState::Yellow);
        io.hold(self.yellow);

        io.set_signal(state, lane, SignalState::Red);
        io.hold(self.all_red);
    }

    pub fn cycle_length(&self, green: Duration) -> Duration {
        green + self.yellow + self.all_red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::signal_trace::SignalTrace;
    use crate::simulation_engine::clock::ManualClock;
    use crate::simulation_engine::intersections::Aspect;

    #[test]
    fn test_sequence_timing() {
        let sequencer = PhaseSequencer::new(&TimingPolicy::default());
        let mut io = ControllerIo::new(ManualClock::new(), SignalTrace::new());
        let mut state = IntersectionState::new();
        let lane = LaneId::ALL[2];

        sequencer.run(&mut state, &mut io, lane, Duration::from_millis(3000));

        let events: Vec<_> = io
            .actuator
            .events()
            .iter()
            .map(|e| (e.at_ms, e.lane.index(), e.aspect))
            .collect();
        assert_eq!(
            events,
            vec![
                (0, 2, Aspect::Green),
                (3000, 2, Aspect::Yellow),
                (5000, 2, Aspect::Red),
            ]
        );
        assert_eq!(io.now(), Duration::from_millis(6000));
        assert_eq!(
            sequencer.cycle_length(Duration::from_millis(3000)),
            Duration::from_millis(6000)
        );
        assert!(state.all_red());
    }

    #[test]
    fn test_leftover_green_is_stopped_through_yellow() {
        let sequencer = PhaseSequencer::new(&TimingPolicy::default());
        let mut io = ControllerIo::new(ManualClock::new(), SignalTrace::new());
        let mut state = IntersectionState::new();
        state.lanes[0].state = SignalState::Green;

        sequencer.run(&mut state, &mut io, LaneId::ALL[1], Duration::from_millis(3000));

        let events: Vec<_> = io
            .actuator
            .events()
            .iter()
            .take(3)
            .map(|e| (e.at_ms, e.lane.index(), e.aspect))
            .collect();
        assert_eq!(
            events,
            vec![
                (0, 0, Aspect::Yellow),
                (2000, 0, Aspect::Red),
                (2000, 1, Aspect::Green),
            ]
        );
        assert!(state.all_red());
    }
}
