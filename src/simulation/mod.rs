//! Simulation driver - perception scans and the per-tick pipeline

pub mod perception;
pub mod tick;

pub use tick::{run_simulation_tick, SimulationEvent};
