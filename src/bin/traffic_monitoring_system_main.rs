use adaptive_signal::config::ControllerConfig;
use adaptive_signal::global_variables::{AMQP_URL, SIGNAL_EVENTS_CSV};
use adaptive_signal::monitoring::traffic_monitoring_system::listen_signal_events;
use std::path::PathBuf;

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
    let url = config
        .monitoring
        .amqp_url
        .unwrap_or_else(|| AMQP_URL.to_string());
    let csv_path = config
        .monitoring
        .events_csv
        .unwrap_or_else(|| PathBuf::from(SIGNAL_EVENTS_CSV));

    println!("Logging signal events to {}", csv_path.display());
    if let Err(e) = listen_signal_events(url, csv_path).await {
        eprintln!("Error in signal events listener: {}", e);
    }
}
