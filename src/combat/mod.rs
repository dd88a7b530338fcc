//! Combat - decision state machine, attack moves, pairwise interaction
//!
//! The state machine decides what an agent wants to do each tick, the
//! attack sequencer turns that decision into timed limb forces, and the
//! interaction resolver layers personality-driven attraction, shoving, and
//! healing on top of any pair of nearby fighters.

pub mod attack;
pub mod interaction;
pub mod state;
