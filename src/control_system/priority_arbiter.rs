use crate::control_system::adaptive_timer::AdaptiveTimer;
use crate::control_system::emergency_override::{EmergencyOverride, EmergencyTransition};
use crate::control_system::pedestrian_handler::PedestrianHandler;
use crate::control_system::phase_sequencer::PhaseSequencer;
use crate::control_system::signal_io::{Actuator, ControllerIo};
use crate::control_system::timing_policy::TimingPolicy;
use crate::global_variables::LANE_COUNT;
use crate::simulation_engine::clock::Clock;
use crate::simulation_engine::intersections::{DensityWeight, IntersectionState, LaneId};
use crate::simulation_engine::sensors::Sensor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How a lane was handled in a normal cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneService {
    Pedestrian,
    Adaptive { weight: DensityWeight, green: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    /// The cycle was given entirely to the emergency override.
    Emergency(EmergencyTransition),
    /// Lanes 0..=3 served in order. `released` is set when the cycle opened
    /// by leaving emergency mode.
    Normal {
        released: bool,
        lanes: [LaneService; LANE_COUNT],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: Duration,
    pub finished_at: Duration,
    pub kind: CycleKind,
}

/// Per-cycle decision maker: emergency first, then pedestrian requests, then
/// density-based adaptive green, one lane at a time.
pub struct PriorityArbiter<S, C, A> {
    state: IntersectionState,
    sensor: S,
    io: ControllerIo<C, A>,
    timer: AdaptiveTimer,
    sequencer: PhaseSequencer,
    pedestrian: PedestrianHandler,
    emergency: EmergencyOverride,
    cycles: u64,
}

impl<S: Sensor, C: Clock, A: Actuator> PriorityArbiter<S, C, A> {
    pub fn new(policy: &TimingPolicy, sensor: S, clock: C, actuator: A) -> Self {
        Self {
            state: IntersectionState::new(),
            sensor,
            io: ControllerIo::new(clock, actuator),
            timer: AdaptiveTimer::new(policy),
            sequencer: PhaseSequencer::new(policy),
            pedestrian: PedestrianHandler::new(policy),
            emergency: EmergencyOverride::new(policy),
            cycles: 0,
        }
    }

    pub fn state(&self) -> &IntersectionState {
        &self.state
    }

    pub fn io(&self) -> &ControllerIo<C, A> {
        &self.io
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn into_parts(self) -> (IntersectionState, S, ControllerIo<C, A>) {
        (self.state, self.sensor, self.io)
    }

    /// Runs exactly one control cycle and reports what it did.
    pub fn run_cycle(&mut self) -> CycleReport {
        self.cycles += 1;
        let started_at = self.io.now();

        let present = self.sensor.emergency_present();
        let transition = self.emergency.evaluate(&mut self.state, started_at, present);
        if transition.is_active() {
            self.emergency.enforce(&mut self.state, &mut self.io);
            return self.report(started_at, CycleKind::Emergency(transition));
        }

        let released = transition == EmergencyTransition::Deactivated;
        if released {
            self.emergency.release(&mut self.state, &mut self.io);
        }

        self.refresh_lanes();

        let lanes = LaneId::ALL.map(|lane| self.serve_lane(lane));
        self.report(started_at, CycleKind::Normal { released, lanes })
    }

    /// Loops until `limit` cycles have run or `stop` is raised. The flag is
    /// only consulted between cycles. Returns the number of cycles run.
    pub fn run(&mut self, limit: Option<u64>, stop: &AtomicBool) -> u64 {
        let mut ran = 0;
        while limit.map_or(true, |limit| ran < limit) && !stop.load(Ordering::SeqCst) {
            let report = self.run_cycle();
            log::debug!("{:?}", report);
            ran += 1;
        }
        ran
    }

    fn refresh_lanes(&mut self) {
        let samples = self.sensor.sample_lanes();
        for (lane, sample) in self.state.lanes.iter_mut().zip(samples) {
            lane.weight = sample.weight;
            lane.pedestrian_request = sample.pedestrian_request;
            log::info!("Lane {} density: {}", lane.id, lane.weight.value());
            if lane.pedestrian_request {
                log::info!("Pedestrian request detected at lane {}", lane.id);
            }
        }
    }

    fn serve_lane(&mut self, lane: LaneId) -> LaneService {
        if self.state.lane(lane).pedestrian_request {
            self.pedestrian.serve(&mut self.state, &mut self.io, lane);
            return LaneService::Pedestrian;
        }
        let weight = self.state.lane(lane).weight;
        let green = self.timer.green_time(weight);
        log::info!(
            "Running adaptive cycle for lane {} with green time: {} ms",
            lane,
            green.as_millis()
        );
        self.sequencer.run(&mut self.state, &mut self.io, lane, green);
        LaneService::Adaptive { weight, green }
    }

    fn report(&self, started_at: Duration, kind: CycleKind) -> CycleReport {
        CycleReport {
            cycle: self.cycles,
            started_at,
            finished_at: self.io.now(),
            kind,
        }
    }
}
