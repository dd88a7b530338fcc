//! Balance controller - keep the ragdoll on its feet
//!
//! Computes a stability score from torso tilt and center-of-mass offset,
//! then emits corrective nudges: torso righting with arm lever assist, leg
//! forces pulling the support base under the COM, lift on legs that hang
//! too far below the torso, and lateral realignment of drifted legs.

use crate::agent::Agent;
use crate::core::config::SimulationConfig;
use crate::core::types::{Limb, Vec2};
use crate::physics::{SkeletonHandles, SkeletonWorld};

/// Tilt at which angular stability bottoms out (45°)
const STABILITY_ANGLE_NORM: f32 = std::f32::consts::FRAC_PI_4;
/// COM offset at which positional stability bottoms out
const STABILITY_OFFSET_NORM: f32 = 50.0;

/// Snapshot of the six body positions, masses, and torso tilt
///
/// Captured once per tick so the controller computes against a consistent
/// view even while forces accumulate.
#[derive(Debug, Clone)]
pub struct SkeletonPose {
    positions: [Vec2; 6],
    masses: [f32; 6],
    pub torso_angle: f32,
}

impl SkeletonPose {
    pub fn capture(skeleton: &SkeletonHandles, world: &dyn SkeletonWorld) -> Self {
        let mut positions = [Vec2::ZERO; 6];
        let mut masses = [0.0; 6];
        for (i, limb) in Limb::ALL.iter().enumerate() {
            let body = skeleton.body(*limb);
            positions[i] = world.position(body);
            masses[i] = world.mass(body);
        }
        Self {
            positions,
            masses,
            torso_angle: world.angle(skeleton.torso),
        }
    }

    pub fn from_parts(positions: [Vec2; 6], masses: [f32; 6], torso_angle: f32) -> Self {
        Self {
            positions,
            masses,
            torso_angle,
        }
    }

    pub fn position(&self, limb: Limb) -> Vec2 {
        self.positions[Limb::ALL.iter().position(|l| *l == limb).unwrap_or(1)]
    }

    /// Mass-weighted average of all six body positions
    pub fn center_of_mass(&self) -> Vec2 {
        let mut total = 0.0;
        let mut weighted = Vec2::ZERO;
        for i in 0..6 {
            total += self.masses[i];
            weighted += self.positions[i] * self.masses[i];
        }
        if total > 0.0 {
            weighted * (1.0 / total)
        } else {
            self.position(Limb::Torso)
        }
    }

    /// Horizontal midpoint of the legs at the lower (ground-ward) leg height
    pub fn support_base(&self) -> Vec2 {
        let left = self.position(Limb::LeftLeg);
        let right = self.position(Limb::RightLeg);
        Vec2::new((left.x + right.x) / 2.0, left.y.min(right.y))
    }
}

/// Normalized [0, 1] measure of upright, centered posture
///
/// Average of angular stability (zero at 45° tilt) and positional
/// stability (zero at 50 units of COM offset from the support base).
pub fn stability_score(torso_angle: f32, com_x: f32, base_x: f32) -> f32 {
    let angular = (1.0 - torso_angle.abs() / STABILITY_ANGLE_NORM).max(0.0);
    let positional = (1.0 - (com_x - base_x).abs() / STABILITY_OFFSET_NORM).max(0.0);
    ((angular + positional) / 2.0).clamp(0.0, 1.0)
}

/// Corrective force per limb; zero vectors mean "no correction needed"
#[derive(Debug, Clone, Default)]
pub struct BalanceForces {
    pub torso: Vec2,
    pub left_arm: Vec2,
    pub right_arm: Vec2,
    pub left_leg: Vec2,
    pub right_leg: Vec2,
}

/// Compute corrective forces for a pose
///
/// Pure so posture control is testable without a physics backend.
pub fn balance_forces(
    pose: &SkeletonPose,
    endurance: f32,
    config: &SimulationConfig,
) -> BalanceForces {
    let mut forces = BalanceForces::default();
    let com = pose.center_of_mass();
    let base = pose.support_base();
    let torso = pose.position(Limb::Torso);
    let angle = pose.torso_angle;

    // Torso righting: tougher fighters tolerate more lean, then correct
    // harder. Arms mirror a fraction of the correction as a lever assist.
    let angle_threshold = config.balance_angle_threshold + endurance * 0.1;
    if angle.abs() > angle_threshold {
        let correction = -angle * endurance * config.torso_righting_gain;
        forces.torso.x += correction;
        forces.torso.y -= correction.abs() * 0.5;

        let assist = correction * config.arm_assist_fraction;
        forces.left_arm.x += assist;
        forces.right_arm.x -= assist;
        let arm_lift = if angle > 0.0 { 30.0 } else { -30.0 };
        forces.left_arm.y += arm_lift;
        forces.right_arm.y -= arm_lift;
    }

    // Pull the support base back under the center of mass.
    let offset = com.x - base.x;
    if offset.abs() > config.com_offset_threshold {
        let correction = -offset * config.leg_correction_gain;
        forces.left_leg.x += correction;
        forces.right_leg.x += correction;
    }

    // Keep feet under the body: lift legs that hang too far below the
    // torso, and pull drifted legs back toward their nominal offset.
    for (limb, side) in [(Limb::LeftLeg, -1.0), (Limb::RightLeg, 1.0)] {
        let leg = pose.position(limb);
        let force = if limb == Limb::LeftLeg {
            &mut forces.left_leg
        } else {
            &mut forces.right_leg
        };

        if torso.y - leg.y > config.leg_drop_limit {
            force.y += config.leg_lift_force;
        }

        let nominal_x = torso.x + side * config.leg_nominal_offset;
        let drift = leg.x - nominal_x;
        if drift.abs() > config.leg_lateral_limit {
            force.x -= drift * config.leg_realign_gain;
        }
    }

    forces
}

/// Recompute stability and apply corrective nudges
///
/// Returns the stability score; the caller records it on the agent.
pub fn stabilize(agent: &Agent, world: &mut dyn SkeletonWorld, config: &SimulationConfig) -> f32 {
    let pose = SkeletonPose::capture(&agent.skeleton, world);
    let com = pose.center_of_mass();
    let base = pose.support_base();
    let score = stability_score(pose.torso_angle, com.x, base.x);

    let forces = balance_forces(&pose, agent.personality.endurance, config);
    let cap = config.max_limb_force;
    for (limb, force) in [
        (Limb::Torso, forces.torso),
        (Limb::LeftArm, forces.left_arm),
        (Limb::RightArm, forces.right_arm),
        (Limb::LeftLeg, forces.left_leg),
        (Limb::RightLeg, forces.right_leg),
    ] {
        if !force.is_zero() {
            agent.nudge(world, limb, force, cap);
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn upright_pose() -> SkeletonPose {
        SkeletonPose::from_parts(
            [
                Vec2::new(0.0, 145.0),  // head
                Vec2::new(0.0, 90.0),   // torso
                Vec2::new(-35.0, 95.0), // left arm
                Vec2::new(35.0, 95.0),  // right arm
                Vec2::new(-15.0, 35.0), // left leg
                Vec2::new(15.0, 35.0),  // right leg
            ],
            [0.8, 2.0, 0.5, 0.5, 0.8, 0.8],
            0.0,
        )
    }

    /// Torso leaning hard right with the COM pushed off the base
    fn toppled_pose() -> SkeletonPose {
        SkeletonPose::from_parts(
            [
                Vec2::new(90.0, 110.0), // head far right
                Vec2::new(50.0, 80.0),  // torso displaced
                Vec2::new(20.0, 85.0),
                Vec2::new(85.0, 85.0),
                Vec2::new(-15.0, 14.0), // legs left behind
                Vec2::new(15.0, 14.0),
            ],
            [0.8, 2.0, 0.5, 0.5, 0.8, 0.8],
            0.9,
        )
    }

    #[test]
    fn test_upright_pose_is_stable() {
        let pose = upright_pose();
        let com = pose.center_of_mass();
        let base = pose.support_base();
        let score = stability_score(pose.torso_angle, com.x, base.x);
        assert!(score > 0.9, "upright pose scored {}", score);
    }

    #[test]
    fn test_upright_pose_needs_no_torso_correction() {
        let forces = balance_forces(&upright_pose(), 0.8, &SimulationConfig::default());
        assert!(forces.torso.is_zero());
        assert!(forces.left_leg.is_zero());
    }

    #[test]
    fn test_support_base_uses_lower_leg() {
        let mut pose = upright_pose();
        pose.positions[4].y = 12.0; // left foot on the ground
        assert_eq!(pose.support_base().y, 12.0);
    }

    #[test]
    fn test_toppled_pose_gets_corrections_every_tick() {
        let config = SimulationConfig::default();
        let pose = toppled_pose();
        let com = pose.center_of_mass();
        let base = pose.support_base();
        let score = stability_score(pose.torso_angle, com.x, base.x);
        assert!(score < 0.2, "toppled pose scored {}", score);

        // A destabilized agent must see corrective torso and leg forces on
        // every tick, not just the first.
        for _ in 0..10 {
            let forces = balance_forces(&pose, 0.8, &config);
            assert!(forces.torso.length() > 0.0);
            assert!(forces.left_leg.length() > 0.0);
            assert!(forces.right_leg.length() > 0.0);
        }
    }

    #[test]
    fn test_righting_force_opposes_tilt() {
        let config = SimulationConfig::default();
        let mut pose = upright_pose();
        pose.torso_angle = 0.8; // leaning right
        let forces = balance_forces(&pose, 0.8, &config);
        assert!(forces.torso.x < 0.0, "righting should push left");

        pose.torso_angle = -0.8;
        let forces = balance_forces(&pose, 0.8, &config);
        assert!(forces.torso.x > 0.0, "righting should push right");
    }

    #[test]
    fn test_dropped_leg_gets_lift() {
        let config = SimulationConfig::default();
        let mut pose = upright_pose();
        pose.positions[4].y = 5.0; // left leg 85 below the torso
        let forces = balance_forces(&pose, 0.8, &config);
        assert!(forces.left_leg.y > 0.0);
        assert_eq!(forces.right_leg.y, 0.0);
    }

    #[test]
    fn test_drifted_leg_realigned() {
        let config = SimulationConfig::default();
        let mut pose = upright_pose();
        pose.positions[5].x = 60.0; // right leg drifted outward
        let forces = balance_forces(&pose, 0.8, &config);
        assert!(forces.right_leg.x < 0.0, "drifted leg pulled back inward");
    }

    proptest! {
        #[test]
        fn prop_stability_always_in_unit_interval(
            angle in -10.0f32..10.0,
            com_x in -1000.0f32..1000.0,
            base_x in -1000.0f32..1000.0,
        ) {
            let score = stability_score(angle, com_x, base_x);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_stability_non_increasing_in_tilt(
            angle in 0.0f32..3.0,
            extra in 0.001f32..1.0,
            offset in -100.0f32..100.0,
        ) {
            let closer = stability_score(angle, offset, 0.0);
            let further = stability_score(angle + extra, offset, 0.0);
            prop_assert!(further <= closer);
        }

        #[test]
        fn prop_stability_non_increasing_in_offset(
            offset in 0.0f32..200.0,
            extra in 0.001f32..100.0,
            angle in -1.0f32..1.0,
        ) {
            let closer = stability_score(angle, offset, 0.0);
            let further = stability_score(angle, offset + extra, 0.0);
            prop_assert!(further <= closer);
        }
    }
}
