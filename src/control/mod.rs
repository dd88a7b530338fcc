//! Procedural posture and locomotion control
//!
//! Both controllers read the skeleton through the binding and answer with
//! additive force nudges only; they tolerate being one of several force
//! sources on the same tick.

pub mod balance;
pub mod locomotion;
