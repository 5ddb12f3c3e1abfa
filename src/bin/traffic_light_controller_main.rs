use adaptive_signal::config::ControllerConfig;
use adaptive_signal::control_system::priority_arbiter::PriorityArbiter;
use adaptive_signal::control_system::signal_io::LoggingActuator;
use adaptive_signal::monitoring::traffic_monitoring_system::AmqpPublisher;
use adaptive_signal::simulation_engine::clock::SystemClock;
use adaptive_signal::simulation_engine::sensors::RandomSensor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match ControllerConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    println!("Starting traffic controller...");

    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Stop requested; finishing the current cycle");
            stop_signal.store(true, Ordering::SeqCst);
        }
    });

    // The controller blocks on every phase hold, so it gets its own thread.
    let controller = tokio::task::spawn_blocking(move || {
        let publisher = config.monitoring.amqp_url.as_deref().and_then(|url| {
            AmqpPublisher::connect(url)
                .map_err(|e| log::warn!("Signal events will not be published: {}", e))
                .ok()
        });
        let sensor = RandomSensor::new(config.simulation.seed, config.simulation.traffic_profile());
        let mut arbiter = PriorityArbiter::new(
            &config.timing,
            sensor,
            SystemClock::new(),
            (LoggingActuator, publisher),
        );
        let ran = arbiter.run(config.simulation.cycles, &stop);

        let (_, _, io) = arbiter.into_parts();
        let (_, publisher) = io.actuator;
        if let Some(publisher) = publisher {
            if let Err(e) = publisher.close() {
                log::warn!("Error closing signal event publisher: {}", e);
            }
        }
        ran
    });

    match controller.await {
        Ok(ran) => println!("Traffic controller stopped after {} cycles", ran),
        Err(e) => eprintln!("Controller error: {}", e),
    }
}
