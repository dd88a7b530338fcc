//! Skeleton binding - the boundary to the rigid-body backend
//!
//! The control loop never owns the physics: it holds opaque handles to six
//! named bodies and five compliant joints, nudges them with additive forces,
//! and reads back position/velocity/angle. Everything else (integration,
//! joint enforcement, contact detection) happens behind [`SkeletonWorld`].

pub mod spring;

use crate::core::error::Result;
use crate::core::types::{Limb, Vec2};
use serde::{Deserialize, Serialize};

/// Opaque handle to a rigid body inside the physics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Opaque handle to a joint inside the physics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointHandle(pub u32);

/// The six body handles and joint handles owned by one agent
///
/// A reduced-fidelity skeleton aliases head and arms to the torso body so
/// every named handle stays valid; forces aimed at those limbs simply land
/// on the torso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonHandles {
    pub head: BodyHandle,
    pub torso: BodyHandle,
    pub left_arm: BodyHandle,
    pub right_arm: BodyHandle,
    pub left_leg: BodyHandle,
    pub right_leg: BodyHandle,
    pub joints: Vec<JointHandle>,
    pub reduced: bool,
}

impl SkeletonHandles {
    /// Body handle for a named limb
    pub fn body(&self, limb: Limb) -> BodyHandle {
        match limb {
            Limb::Head => self.head,
            Limb::Torso => self.torso,
            Limb::LeftArm => self.left_arm,
            Limb::RightArm => self.right_arm,
            Limb::LeftLeg => self.left_leg,
            Limb::RightLeg => self.right_leg,
        }
    }

    /// All six named bodies (may contain aliases when reduced)
    pub fn bodies(&self) -> [BodyHandle; 6] {
        [
            self.head,
            self.torso,
            self.left_arm,
            self.right_arm,
            self.left_leg,
            self.right_leg,
        ]
    }

    /// Which limb a body handle belongs to, if any
    ///
    /// On a reduced skeleton an aliased handle resolves to the torso.
    pub fn limb_of(&self, body: BodyHandle) -> Option<Limb> {
        if body == self.torso {
            Some(Limb::Torso)
        } else if body == self.head {
            Some(Limb::Head)
        } else if body == self.left_arm {
            Some(Limb::LeftArm)
        } else if body == self.right_arm {
            Some(Limb::RightArm)
        } else if body == self.left_leg {
            Some(Limb::LeftLeg)
        } else if body == self.right_leg {
            Some(Limb::RightLeg)
        } else {
            None
        }
    }
}

/// A reported contact between two bodies of different skeletons
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Magnitude of the relative velocity at the moment of contact
    pub relative_speed: f32,
}

/// The physics backend consumed by the control loop
///
/// Forces are additive nudges accumulated until the next [`step`]; the
/// controller is only ever one of several force sources on the same tick.
///
/// [`step`]: SkeletonWorld::step
pub trait SkeletonWorld {
    /// Create a full six-body, five-joint skeleton with its torso at `origin`
    fn create_skeleton(&mut self, origin: Vec2, scale: f32) -> Result<SkeletonHandles>;

    /// Create a reduced-fidelity skeleton (torso + legs, aliased head/arms)
    ///
    /// Infallible by design: this is the degraded path taken when
    /// [`create_skeleton`](SkeletonWorld::create_skeleton) fails.
    fn create_reduced_skeleton(&mut self, origin: Vec2, scale: f32) -> SkeletonHandles;

    /// Detach and deactivate all bodies and joints of a skeleton
    fn destroy_skeleton(&mut self, handles: &SkeletonHandles);

    /// Accumulate a force at a body's center for the next step
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);

    fn position(&self, body: BodyHandle) -> Vec2;

    fn velocity(&self, body: BodyHandle) -> Vec2;

    /// Orientation of a body in radians (0 = upright)
    fn angle(&self, body: BodyHandle) -> f32;

    fn mass(&self, body: BodyHandle) -> f32;

    /// Teleport a whole skeleton so its torso sits at `origin`, zeroing
    /// velocities. World-control operation, not available to controllers.
    fn reposition_skeleton(&mut self, handles: &SkeletonHandles, origin: Vec2);

    /// Advance the physics by `dt` seconds, consuming accumulated forces
    fn step(&mut self, dt: f32);

    /// Take all contacts reported since the last drain
    fn drain_contacts(&mut self) -> Vec<Contact>;
}
