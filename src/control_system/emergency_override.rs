use crate::control_system::signal_io::{Actuator, ControllerIo};
use crate::control_system::timing_policy::TimingPolicy;
use crate::simulation_engine::clock::Clock;
use crate::simulation_engine::intersections::{ControlMode, IntersectionState, LaneId, SignalState};
use std::time::Duration;

/// Outcome of one emergency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyTransition {
    /// Normal and no emergency vehicle.
    Idle,
    /// Normal -> Emergency on this check.
    Activated,
    /// Still inside the cooldown window.
    Held,
    /// Emergency -> Normal on this check.
    Deactivated,
}

impl EmergencyTransition {
    pub fn is_active(self) -> bool {
        matches!(self, EmergencyTransition::Activated | EmergencyTransition::Held)
    }
}

/// Gives the priority lane green with every other lane red, gated by a cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyOverride {
    priority_lane: LaneId,
    cooldown: Duration,
    hold: Duration,
    yellow: Duration,
    all_red: Duration,
}

impl EmergencyOverride {
    pub fn new(policy: &TimingPolicy) -> Self {
        Self {
            priority_lane: policy.priority_lane(),
            cooldown: policy.emergency_cooldown(),
            hold: policy.emergency_hold(),
            yellow: policy.yellow(),
            all_red: policy.all_red(),
        }
    }

    pub fn priority_lane(&self) -> LaneId {
        self.priority_lane
    }

    /// Advances the Normal/Emergency state machine. Leaving Emergency depends
    /// only on the elapsed time since activation, not on whether the
    /// emergency signal has cleared.
    pub fn evaluate(&self, state: &mut IntersectionState, now: Duration, present: bool) -> EmergencyTransition {
        match state.mode {
            ControlMode::Normal if present => {
                state.mode = ControlMode::Emergency { activated_at: now };
                log::info!("Emergency vehicle detected - activating priority mode");
                EmergencyTransition::Activated
            }
            ControlMode::Normal => EmergencyTransition::Idle,
            ControlMode::Emergency { activated_at } => {
                if now.saturating_sub(activated_at) >= self.cooldown {
                    state.mode = ControlMode::Normal;
                    log::info!("Emergency mode deactivated");
                    EmergencyTransition::Deactivated
                } else {
                    EmergencyTransition::Held
                }
            }
        }
    }

    /// Every lane except the priority lane RED, the priority lane GREEN, then
    /// a blocking hold. Called again on every cycle while the mode stays
    /// Emergency, so the green repeats in hold-length pulses.
    pub fn enforce<C: Clock, A: Actuator>(&self, state: &mut IntersectionState, io: &mut ControllerIo<C, A>) {
        for lane in LaneId::ALL.into_iter().filter(|&l| l != self.priority_lane) {
            if state.lane(lane).state != SignalState::Red {
                io.set_signal(state, lane, SignalState::Red);
            }
        }
        if state.lane(self.priority_lane).state != SignalState::Green {
            io.set_signal(state, self.priority_lane, SignalState::Green);
        }
        log::info!(
            "Emergency route green on lane {} for {} ms",
            self.priority_lane,
            self.hold.as_millis()
        );
        io.hold(self.hold);
    }

    /// Brings the priority lane back to RED through YELLOW and holds the
    /// all-red buffer, so normal sequencing restarts from baseline.
    pub fn release<C: Clock, A: Actuator>(&self, state: &mut IntersectionState, io: &mut ControllerIo<C, A>) {
        if io.stop_green_lanes(state, self.yellow).is_empty() && state.all_red() {
            return;
        }
        io.all_red(state);
        io.hold(self.all_red);
    }
}
