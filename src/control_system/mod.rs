pub mod adaptive_timer;
pub mod emergency_override;
pub mod pedestrian_handler;
pub mod phase_sequencer;
pub mod priority_arbiter;
pub mod signal_io;
pub mod timing_policy;
