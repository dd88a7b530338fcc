//! Gait synthesizer - sinusoidal walking toward a target
//!
//! Legs alternate on a shared phase accumulator, arms swing counter-phase,
//! and the torso gets a steady forward drive. Everything is scaled by the
//! current stability score, so a wobbling fighter takes smaller steps
//! instead of powering through and falling over.

use crate::agent::{Agent, MovementState};
use crate::core::config::SimulationConfig;
use crate::core::types::{Limb, Vec2};
use crate::physics::SkeletonWorld;

/// Floor under the walk-speed multiplier while exhausted
const WALK_SPEED_FLOOR: f32 = 0.3;
/// Per-tick decay of the multiplier below the stamina threshold
const WALK_SPEED_DECAY: f32 = 0.95;
/// Per-tick recovery of the multiplier back toward its base
const WALK_SPEED_RECOVERY: f32 = 1.01;
/// Fraction of peak leg force used as swing-phase lift
const STEP_LIFT_FRACTION: f32 = 0.3;

/// Per-limb forces for one gait step
#[derive(Debug, Clone, Default)]
pub struct GaitForces {
    pub torso: Vec2,
    pub left_arm: Vec2,
    pub right_arm: Vec2,
    pub left_leg: Vec2,
    pub right_leg: Vec2,
}

/// Compute one step of the gait cycle
///
/// `direction` is -1 or +1 along the x axis toward the target. Pure for the
/// same reason the balance controller is.
pub fn gait_forces(
    walk_cycle: f32,
    direction: f32,
    stability: f32,
    walk_speed: f32,
    aggression: f32,
    config: &SimulationConfig,
) -> GaitForces {
    let mut forces = GaitForces::default();
    let left_phase = walk_cycle.sin();
    let right_phase = (walk_cycle + std::f32::consts::PI).sin();
    let leg_force = config.walk_force * stability * walk_speed;

    // Legs push on their stance half-cycle and lift on the swing half.
    forces.left_leg.x = direction * leg_force * left_phase.max(0.0);
    forces.left_leg.y = leg_force * STEP_LIFT_FRACTION * (-left_phase).max(0.0);
    forces.right_leg.x = direction * leg_force * right_phase.max(0.0);
    forces.right_leg.y = leg_force * STEP_LIFT_FRACTION * (-right_phase).max(0.0);

    // Arms swing opposite their same-side leg.
    let arm_force = leg_force * config.arm_swing_fraction;
    forces.left_arm.x = direction * arm_force * right_phase;
    forces.right_arm.x = direction * arm_force * left_phase;

    // Eager fighters lean into the approach harder. The base share keeps
    // even timid fighters closing at a fighting pace.
    let drive = config.torso_drive_force * (0.7 + aggression * 0.3) * walk_speed;
    forces.torso.x = direction * drive * stability;

    forces
}

/// Advance the walk cycle and push the agent toward `target_x`
pub fn walk(
    agent: &mut Agent,
    world: &mut dyn SkeletonWorld,
    target_x: f32,
    config: &SimulationConfig,
) {
    let torso_x = world.position(agent.skeleton.torso).x;
    let direction = if target_x >= torso_x { 1.0 } else { -1.0 };

    agent.movement.walk_cycle += config.walk_phase_rate;

    let forces = gait_forces(
        agent.movement.walk_cycle,
        direction,
        agent.stability,
        agent.movement.walk_speed,
        agent.personality.aggression,
        config,
    );

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
}

/// Couple walking speed to stamina
///
/// Below the stamina threshold the multiplier decays toward a floor; above
/// it, it recovers back to the agent's base speed. The feedback is what
/// makes exhausted fighters visibly slow down rather than stop dead.
pub fn update_walk_speed(movement: &mut MovementState, stamina: f32, config: &SimulationConfig) {
    if stamina < config.low_stamina_threshold {
        movement.walk_speed = (movement.walk_speed * WALK_SPEED_DECAY).max(WALK_SPEED_FLOOR);
    } else {
        movement.walk_speed =
            (movement.walk_speed * WALK_SPEED_RECOVERY).min(movement.base_walk_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn test_legs_alternate_across_half_cycle() {
        let cfg = config();
        let a = gait_forces(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 1.0, 0.5, &cfg);
        // Left leg at peak stance, right leg swinging.
        assert!(a.left_leg.x > 0.0);
        assert_eq!(a.right_leg.x, 0.0);
        assert!(a.right_leg.y > 0.0);

        let b = gait_forces(3.0 * std::f32::consts::FRAC_PI_2, 1.0, 1.0, 1.0, 0.5, &cfg);
        assert_eq!(b.left_leg.x, 0.0);
        assert!(b.right_leg.x > 0.0);
    }

    #[test]
    fn test_gait_scales_with_stability() {
        let cfg = config();
        let steady = gait_forces(1.0, 1.0, 1.0, 1.0, 0.5, &cfg);
        let wobbly = gait_forces(1.0, 1.0, 0.2, 1.0, 0.5, &cfg);
        assert!(wobbly.left_leg.x < steady.left_leg.x);
        assert!(wobbly.torso.x < steady.torso.x);
    }

    #[test]
    fn test_direction_flips_all_horizontal_forces() {
        let cfg = config();
        let fwd = gait_forces(1.0, 1.0, 1.0, 1.0, 0.5, &cfg);
        let back = gait_forces(1.0, -1.0, 1.0, 1.0, 0.5, &cfg);
        assert_eq!(fwd.torso.x, -back.torso.x);
        assert_eq!(fwd.left_leg.x, -back.left_leg.x);
    }

    #[test]
    fn test_aggression_raises_torso_drive() {
        let cfg = config();
        let timid = gait_forces(1.0, 1.0, 1.0, 1.0, 0.0, &cfg);
        let fierce = gait_forces(1.0, 1.0, 1.0, 1.0, 1.0, &cfg);
        assert!(fierce.torso.x > timid.torso.x);
    }

    #[test]
    fn test_walk_speed_decays_and_recovers() {
        let cfg = config();
        let mut movement = MovementState::new(1.0);
        for _ in 0..50 {
            update_walk_speed(&mut movement, 5.0, &cfg);
        }
        assert!((movement.walk_speed - WALK_SPEED_FLOOR).abs() < 0.05);

        for _ in 0..500 {
            update_walk_speed(&mut movement, 80.0, &cfg);
        }
        assert!((movement.walk_speed - 1.0).abs() < 1e-4);
    }
}
