// simulation_engine/mod.rs
pub mod clock;
pub mod intersections;
pub mod sensors;
