pub mod signal_trace;
pub mod traffic_monitoring_system;
