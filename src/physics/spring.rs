//! Compliant point-mass realization of the skeleton binding
//!
//! Bodies are point masses, joints are damped distance springs, the ground
//! is a plane at y = 0. Integration is semi-implicit Euler. Contacts are
//! reported for overlapping bodies of different skeletons together with
//! their relative speed; resolution (damage, knockback) is the caller's
//! business, matching the binding contract.

use crate::core::error::{ArenaError, Result};
use crate::core::types::Vec2;
use crate::physics::{BodyHandle, Contact, JointHandle, SkeletonHandles, SkeletonWorld};

// Skeleton proportions of the reference ragdoll, scaled per agent.
const HEAD_OFFSET: f32 = 55.0;
const ARM_OFFSET_X: f32 = 35.0;
const ARM_OFFSET_Y: f32 = 5.0;
const LEG_OFFSET_X: f32 = 15.0;
const LEG_OFFSET_Y: f32 = -55.0;

const HEAD_MASS: f32 = 0.8;
const TORSO_MASS: f32 = 2.0;
const ARM_MASS: f32 = 0.5;
const LEG_MASS: f32 = 0.8;

const HEAD_RADIUS: f32 = 15.0;
const TORSO_RADIUS: f32 = 25.0;
const ARM_RADIUS: f32 = 10.0;
const LEG_RADIUS: f32 = 12.0;

// Spring constants: neck and hips stiffer than shoulders, as in the
// reference skeleton (0.8 vs 0.7 constraint stiffness).
const NECK_STIFFNESS: f32 = 300.0;
const SHOULDER_STIFFNESS: f32 = 200.0;
const HIP_STIFFNESS: f32 = 300.0;
const JOINT_DAMPING: f32 = 7.0;

const AIR_DRAG: f32 = 1.5;
const GROUND_FRICTION: f32 = 6.0;

#[derive(Debug, Clone)]
struct PointBody {
    position: Vec2,
    velocity: Vec2,
    force_accum: Vec2,
    angle: f32,
    mass: f32,
    radius: f32,
    skeleton: u32,
    alive: bool,
}

#[derive(Debug, Clone)]
struct SpringJoint {
    a: BodyHandle,
    b: BodyHandle,
    rest: f32,
    stiffness: f32,
    alive: bool,
}

/// Point-mass spring world implementing [`SkeletonWorld`]
pub struct SpringWorld {
    bodies: Vec<PointBody>,
    joints: Vec<SpringJoint>,
    skeletons: Vec<SkeletonHandles>,
    contacts: Vec<Contact>,
    gravity: f32,
    max_bodies: usize,
    next_skeleton: u32,
}

impl SpringWorld {
    pub fn new(gravity: f32, max_bodies: usize) -> Self {
        Self {
            bodies: Vec::new(),
            joints: Vec::new(),
            skeletons: Vec::new(),
            contacts: Vec::new(),
            gravity,
            max_bodies,
            next_skeleton: 0,
        }
    }

    pub fn active_body_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.alive).count()
    }

    fn add_body(&mut self, position: Vec2, mass: f32, radius: f32, skeleton: u32) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(PointBody {
            position,
            velocity: Vec2::ZERO,
            force_accum: Vec2::ZERO,
            angle: 0.0,
            mass,
            radius,
            skeleton,
            alive: true,
        });
        handle
    }

    fn add_joint(&mut self, a: BodyHandle, b: BodyHandle, stiffness: f32) -> JointHandle {
        let rest = self.bodies[a.0 as usize]
            .position
            .distance(self.bodies[b.0 as usize].position);
        let handle = JointHandle(self.joints.len() as u32);
        self.joints.push(SpringJoint {
            a,
            b,
            rest,
            stiffness,
            alive: true,
        });
        handle
    }

    fn body(&self, handle: BodyHandle) -> &PointBody {
        &self.bodies[handle.0 as usize]
    }

    fn body_mut(&mut self, handle: BodyHandle) -> &mut PointBody {
        &mut self.bodies[handle.0 as usize]
    }

    fn apply_joint_forces(&mut self) {
        for j in 0..self.joints.len() {
            let joint = self.joints[j].clone();
            if !joint.alive {
                continue;
            }
            let pa = self.body(joint.a).position;
            let pb = self.body(joint.b).position;
            let va = self.body(joint.a).velocity;
            let vb = self.body(joint.b).velocity;

            let delta = pb - pa;
            let dist = delta.length();
            if dist < 0.0001 {
                continue;
            }
            let axis = delta * (1.0 / dist);

            // Hooke spring along the axis plus relative-velocity damping.
            let stretch = dist - joint.rest;
            let rel = vb - va;
            let rel_along = rel.x * axis.x + rel.y * axis.y;
            let magnitude = stretch * joint.stiffness + rel_along * JOINT_DAMPING;

            let force = axis * magnitude;
            self.body_mut(joint.a).force_accum += force;
            self.body_mut(joint.b).force_accum += force * -1.0;
        }
    }

    fn update_torso_angles(&mut self) {
        for i in 0..self.skeletons.len() {
            let handles = self.skeletons[i].clone();
            if !self.body(handles.torso).alive {
                continue;
            }
            if handles.reduced {
                // No head axis to derive orientation from.
                continue;
            }
            let head = self.body(handles.head).position;
            let torso = self.body(handles.torso).position;
            let dx = head.x - torso.x;
            let dy = head.y - torso.y;
            // 0 when the head sits directly above the torso.
            self.body_mut(handles.torso).angle = dx.atan2(dy);
        }
    }

    fn detect_contacts(&mut self) {
        for i in 0..self.bodies.len() {
            if !self.bodies[i].alive {
                continue;
            }
            for k in (i + 1)..self.bodies.len() {
                if !self.bodies[k].alive {
                    continue;
                }
                if self.bodies[i].skeleton == self.bodies[k].skeleton {
                    continue;
                }
                let dist = self.bodies[i].position.distance(self.bodies[k].position);
                if dist < self.bodies[i].radius + self.bodies[k].radius {
                    let rel = self.bodies[i].velocity - self.bodies[k].velocity;
                    self.contacts.push(Contact {
                        a: BodyHandle(i as u32),
                        b: BodyHandle(k as u32),
                        relative_speed: rel.length(),
                    });
                }
            }
        }
    }

    fn build_skeleton(&mut self, origin: Vec2, scale: f32, reduced: bool) -> SkeletonHandles {
        let skeleton = self.next_skeleton;
        self.next_skeleton += 1;
        let s = scale;

        let torso = self.add_body(origin, TORSO_MASS * s, TORSO_RADIUS * s, skeleton);
        let (left_leg, right_leg) = (
            self.add_body(
                Vec2::new(origin.x - LEG_OFFSET_X * s, origin.y + LEG_OFFSET_Y * s),
                LEG_MASS * s,
                LEG_RADIUS * s,
                skeleton,
            ),
            self.add_body(
                Vec2::new(origin.x + LEG_OFFSET_X * s, origin.y + LEG_OFFSET_Y * s),
                LEG_MASS * s,
                LEG_RADIUS * s,
                skeleton,
            ),
        );

        let mut joints = vec![
            self.add_joint(torso, left_leg, HIP_STIFFNESS),
            self.add_joint(torso, right_leg, HIP_STIFFNESS),
        ];

        let (head, left_arm, right_arm) = if reduced {
            (torso, torso, torso)
        } else {
            let head = self.add_body(
                Vec2::new(origin.x, origin.y + HEAD_OFFSET * s),
                HEAD_MASS * s,
                HEAD_RADIUS * s,
                skeleton,
            );
            let left_arm = self.add_body(
                Vec2::new(origin.x - ARM_OFFSET_X * s, origin.y + ARM_OFFSET_Y * s),
                ARM_MASS * s,
                ARM_RADIUS * s,
                skeleton,
            );
            let right_arm = self.add_body(
                Vec2::new(origin.x + ARM_OFFSET_X * s, origin.y + ARM_OFFSET_Y * s),
                ARM_MASS * s,
                ARM_RADIUS * s,
                skeleton,
            );
            joints.push(self.add_joint(torso, head, NECK_STIFFNESS));
            joints.push(self.add_joint(torso, left_arm, SHOULDER_STIFFNESS));
            joints.push(self.add_joint(torso, right_arm, SHOULDER_STIFFNESS));
            (head, left_arm, right_arm)
        };

        let handles = SkeletonHandles {
            head,
            torso,
            left_arm,
            right_arm,
            left_leg,
            right_leg,
            joints,
            reduced,
        };
        self.skeletons.push(handles.clone());
        handles
    }
}

impl SkeletonWorld for SpringWorld {
    fn create_skeleton(&mut self, origin: Vec2, scale: f32) -> Result<SkeletonHandles> {
        if self.active_body_count() + 6 > self.max_bodies {
            return Err(ArenaError::SkeletonCreation(format!(
                "body capacity exceeded ({} of {})",
                self.active_body_count(),
                self.max_bodies
            )));
        }
        Ok(self.build_skeleton(origin, scale, false))
    }

    fn create_reduced_skeleton(&mut self, origin: Vec2, scale: f32) -> SkeletonHandles {
        self.build_skeleton(origin, scale, true)
    }

    fn destroy_skeleton(&mut self, handles: &SkeletonHandles) {
        let skeleton = self.body(handles.torso).skeleton;
        for body in &mut self.bodies {
            if body.skeleton == skeleton {
                body.alive = false;
            }
        }
        for &joint in &handles.joints {
            self.joints[joint.0 as usize].alive = false;
        }
        let bodies = &self.bodies;
        self.skeletons
            .retain(|s| bodies[s.torso.0 as usize].skeleton != skeleton);
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        let body = self.body_mut(body);
        if body.alive {
            body.force_accum += force;
        }
    }

    fn position(&self, body: BodyHandle) -> Vec2 {
        self.body(body).position
    }

    fn velocity(&self, body: BodyHandle) -> Vec2 {
        self.body(body).velocity
    }

    fn angle(&self, body: BodyHandle) -> f32 {
        self.body(body).angle
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.body(body).mass
    }

    fn reposition_skeleton(&mut self, handles: &SkeletonHandles, origin: Vec2) {
        let offset = origin - self.body(handles.torso).position;
        let skeleton = self.body(handles.torso).skeleton;
        for body in &mut self.bodies {
            if body.skeleton == skeleton && body.alive {
                body.position += offset;
                body.velocity = Vec2::ZERO;
            }
        }
    }

    fn step(&mut self, dt: f32) {
        self.apply_joint_forces();

        for body in &mut self.bodies {
            if !body.alive {
                continue;
            }
            let mut force = body.force_accum;
            force.y -= self.gravity * body.mass;

            body.velocity += force * (dt / body.mass);
            body.velocity = body.velocity * (1.0 - AIR_DRAG * dt).max(0.0);
            body.position += body.velocity * dt;

            // Ground plane: rest on y = 0, friction bleeds lateral speed.
            if body.position.y < body.radius {
                body.position.y = body.radius;
                if body.velocity.y < 0.0 {
                    body.velocity.y = 0.0;
                }
                body.velocity.x *= (1.0 - GROUND_FRICTION * dt).max(0.0);
            }

            body.force_accum = Vec2::ZERO;
        }

        self.update_torso_angles();
        self.detect_contacts();
    }

    fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }
}
