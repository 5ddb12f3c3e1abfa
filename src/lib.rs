//! Adaptive signal control for a four-approach intersection.
//!
//! Each control cycle the [`PriorityArbiter`] checks for an emergency
//! vehicle first, then serves lanes 0..=3 in order: a pending pedestrian
//! request interrupts the lane, otherwise it gets a green time scaled by its
//! traffic density. Only one lane is ever green.
//!
//! [`PriorityArbiter`]: control_system::priority_arbiter::PriorityArbiter

pub mod config;
pub mod control_system;
pub mod errors;
pub mod global_variables;
pub mod monitoring;
pub mod shared_data;
pub mod simulation_engine;
