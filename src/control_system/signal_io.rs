use crate::simulation_engine::clock::Clock;
use crate::simulation_engine::intersections::{Aspect, IntersectionState, LaneId, SignalState};
use std::time::Duration;

/// Drives the physical signal heads.
pub trait Actuator {
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect);
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect) {
        (**self).drive(at, lane, aspect);
    }
}

impl<T: Actuator + ?Sized> Actuator for Box<T> {
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect) {
        (**self).drive(at, lane, aspect);
    }
}

impl<A: Actuator, B: Actuator> Actuator for (A, B) {
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect) {
        self.0.drive(at, lane, aspect);
        self.1.drive(at, lane, aspect);
    }
}

impl<A: Actuator> Actuator for Option<A> {
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect) {
        if let Some(actuator) = self {
            actuator.drive(at, lane, aspect);
        }
    }
}

/// Prints every lamp change through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingActuator;

impl Actuator for LoggingActuator {
    fn drive(&mut self, at: Duration, lane: LaneId, aspect: Aspect) {
        log::info!("[{:>8} ms] Lane {} -> {:?}", at.as_millis(), lane, aspect);
    }
}

/// Clock and actuator bundled together. Every signal change made by the
/// control components goes through here, so the stored lane state and the
/// lamp output never disagree.
pub struct ControllerIo<C, A> {
    pub clock: C,
    pub actuator: A,
}

impl<C: Clock, A: Actuator> ControllerIo<C, A> {
    pub fn new(clock: C, actuator: A) -> Self {
        Self { clock, actuator }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn hold(&mut self, duration: Duration) {
        self.clock.hold(duration);
    }

    /// Updates the lane's logical state and shows it on the signal head.
    pub fn set_signal(&mut self, state: &mut IntersectionState, lane: LaneId, signal: SignalState) {
        state.lane_mut(lane).state = signal;
        log::debug!("Lane {} set to {:?}", lane, signal);
        let now = self.clock.now();
        self.actuator.drive(now, lane, signal.into());
        let conflict = state.check_conflicts();
        debug_assert!(!conflict, "more than one lane green: {:?}", state.green_lanes());
    }

    /// Changes only the lamp output; the logical lane state is untouched.
    pub fn show(&mut self, lane: LaneId, aspect: Aspect) {
        let now = self.clock.now();
        self.actuator.drive(now, lane, aspect);
    }

    /// Takes every GREEN lane to YELLOW and holds for `yellow`. Returns the
    /// lanes that were stopped; they are left showing YELLOW.
    pub fn stop_green_lanes(&mut self, state: &mut IntersectionState, yellow: Duration) -> Vec<LaneId> {
        let green = state.green_lanes();
        if green.is_empty() {
            return green;
        }
        for &lane in &green {
            self.set_signal(state, lane, SignalState::Yellow);
        }
        self.hold(yellow);
        green
    }

    /// Forces every lane to RED. Lanes already RED are left alone.
    pub fn all_red(&mut self, state: &mut IntersectionState) {
        for lane in LaneId::ALL {
            if state.lane(lane).state != SignalState::Red {
                self.set_signal(state, lane, SignalState::Red);
            }
        }
    }
}
