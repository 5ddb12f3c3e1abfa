// simulation_main.rs
use adaptive_signal::config::ControllerConfig;
use adaptive_signal::global_variables::SIGNAL_TIMELINE_PNG;
use adaptive_signal::control_system::priority_arbiter::{CycleKind, LaneService, PriorityArbiter};
use adaptive_signal::monitoring::signal_trace::SignalTrace;
use adaptive_signal::simulation_engine::clock::ManualClock;
use adaptive_signal::simulation_engine::sensors::RandomSensor;
use std::path::PathBuf;

const DEFAULT_CYCLES: u64 = 20;

fn main() {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match ControllerConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let sensor = RandomSensor::new(config.simulation.seed, config.simulation.traffic_profile());
    let mut arbiter =
        PriorityArbiter::new(&config.timing, sensor, ManualClock::new(), SignalTrace::new());

    let cycles = config.simulation.cycles.unwrap_or(DEFAULT_CYCLES);
    let (mut emergency, mut pedestrian, mut adaptive) = (0, 0, 0);
    for _ in 0..cycles {
        let report = arbiter.run_cycle();
        match report.kind {
            CycleKind::Emergency(_) => emergency += 1,
            CycleKind::Normal { lanes, .. } => {
                for service in lanes {
                    match service {
                        LaneService::Pedestrian => pedestrian += 1,
                        LaneService::Adaptive { .. } => adaptive += 1,
                    }
                }
            }
        }
    }

    let elapsed = arbiter.io().now();
    let (_, _, io) = arbiter.into_parts();
    let trace = io.actuator;
    println!(
        "Simulated {} cycles over {} s: {} emergency pulses, {} pedestrian crossings, {} adaptive phases, {} lamp changes",
        cycles,
        elapsed.as_secs(),
        emergency,
        pedestrian,
        adaptive,
        trace.events().len()
    );

    if let Some(path) = &config.monitoring.events_csv {
        if let Err(e) = trace.write_csv(path) {
            eprintln!("Error writing signal events: {}", e);
        }
    }
    let timeline_png = config
        .monitoring
        .timeline_png
        .unwrap_or_else(|| PathBuf::from(SIGNAL_TIMELINE_PNG));
    if let Err(e) = trace.render_timeline(&timeline_png) {
        eprintln!("Error rendering signal timeline: {}", e);
    }
}
