//! Ragdoll Arena - autonomous ragdoll fighters
//!
//! Active ragdolls that stand, walk, and fight using only additive forces
//! on their own limbs. Each fighter runs a perception -> decision ->
//! control loop every tick: a combat state machine picks what to do, and
//! balance, locomotion, and attack controllers turn that into limb nudges
//! that a spring-mass physics backend integrates.
//!
//! The crate exposes [`Arena`] as the world container and
//! [`run_simulation_tick`] as the single way to advance time.

pub mod agent;
pub mod arena;
pub mod combat;
pub mod control;
pub mod core;
pub mod physics;
pub mod simulation;

pub use crate::arena::Arena;
pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{ArenaError, Result};
pub use crate::simulation::{run_simulation_tick, SimulationEvent};
