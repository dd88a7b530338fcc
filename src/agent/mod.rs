//! Agent - an autonomous ragdoll fighter
//!
//! The agent owns its identity, personality, skeleton handles, vitals, and
//! combat record directly (no side tables keyed by id). It never owns the
//! physics: all influence on the world goes through capped additive forces
//! on its own limbs.

pub mod appearance;
pub mod personality;
pub mod vitals;

use crate::agent::appearance::Appearance;
use crate::agent::personality::Personality;
use crate::agent::vitals::Vitals;
use crate::combat::attack::AttackSequence;
use crate::combat::state::CombatState;
use crate::core::types::{AgentId, Limb, Tick, Vec2};
use crate::physics::{SkeletonHandles, SkeletonWorld};

/// Mutable combat record
///
/// `target` is a weak reference: a lookup by id, re-validated on every use,
/// never an ownership relation.
#[derive(Debug, Clone, Default)]
pub struct CombatStatus {
    pub state: CombatState,
    pub target: Option<AgentId>,
    /// Tick of the last perception scan; `None` = never scanned
    pub last_perception: Option<Tick>,
    /// Seconds until the next attack may start
    pub attack_cooldown: f32,
    /// Seconds of stagger remaining
    pub stagger_timer: f32,
    pub is_attacking: bool,
    /// The attack in flight, if any; invariant: at most one
    pub sequence: Option<AttackSequence>,
}

/// Gait bookkeeping for the motion synthesizer
#[derive(Debug, Clone)]
pub struct MovementState {
    /// Continuously increasing walk-phase accumulator (radians)
    pub walk_cycle: f32,
    /// Per-agent speed multiplier; decays when exhausted, recovers when not
    pub walk_speed: f32,
    /// Ceiling the multiplier recovers back to
    pub base_walk_speed: f32,
}

impl MovementState {
    pub fn new(walk_speed: f32) -> Self {
        Self {
            walk_cycle: 0.0,
            walk_speed,
            base_walk_speed: walk_speed,
        }
    }
}

#[derive(Debug)]
pub struct Agent {
    pub id: AgentId,
    pub personality: Personality,
    pub appearance: Appearance,
    pub skeleton: SkeletonHandles,
    pub vitals: Vitals,
    /// Recomputed every tick by the balance controller
    pub stability: f32,
    pub combat: CombatStatus,
    pub movement: MovementState,
    /// Cleared permanently at zero health; an inactive agent stays in the
    /// registry ("defeated") but never re-enters perception or receives
    /// forces
    pub active: bool,
}

impl Agent {
    pub fn new(
        id: AgentId,
        personality: Personality,
        appearance: Appearance,
        skeleton: SkeletonHandles,
        walk_speed: f32,
    ) -> Self {
        Self {
            id,
            personality,
            appearance,
            skeleton,
            vitals: Vitals::default(),
            stability: 0.0,
            combat: CombatStatus::default(),
            movement: MovementState::new(walk_speed),
            active: true,
        }
    }

    /// Apply an additive force to one of this agent's limbs
    ///
    /// Magnitudes above the safety cap are scaled down, never rejected;
    /// inactive agents absorb nothing.
    pub fn nudge(&self, world: &mut dyn SkeletonWorld, limb: Limb, force: Vec2, cap: f32) {
        if !self.active {
            return;
        }
        let magnitude = force.length();
        let force = if magnitude > cap {
            force * (cap / magnitude)
        } else {
            force
        };
        world.apply_force(self.skeleton.body(limb), force);
    }

    /// Alive and still fighting
    pub fn is_active(&self) -> bool {
        self.active && self.vitals.health > 0.0
    }

    /// Permanently take this agent out of the fight
    pub fn deactivate(&mut self) {
        self.active = false;
        self.combat.target = None;
        self.combat.sequence = None;
        self.combat.is_attacking = false;
    }

    /// Reset vitals and combat record for a fresh engagement
    pub fn reset_for_engagement(&mut self) {
        self.vitals = Vitals::default();
        self.combat = CombatStatus::default();
        self.movement.walk_speed = self.movement.base_walk_speed;
        self.active = true;
    }

    /// The striking limb currently live for contact damage, if any
    pub fn live_limb(&self) -> Option<Limb> {
        self.combat
            .sequence
            .as_ref()
            .filter(|seq| seq.strike_live())
            .map(|seq| seq.strike_limb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::spring::SpringWorld;
    use crate::physics::SkeletonWorld as _;

    fn test_agent(world: &mut SpringWorld) -> Agent {
        let skeleton = world.create_skeleton(Vec2::new(0.0, 90.0), 1.0).unwrap();
        let personality = Personality {
            aggression: 0.5,
            courage: 0.5,
            intelligence: 0.5,
            reflexes: 0.7,
            endurance: 0.8,
        };
        let appearance = Appearance {
            skin_tone: "#ffdbac".to_string(),
            shirt_color: "#4a90e2".to_string(),
            pant_color: "#2c3e50".to_string(),
            size: 1.0,
        };
        Agent::new(AgentId::new(), personality, appearance, skeleton, 1.0)
    }

    #[test]
    fn test_nudge_caps_force() {
        let mut world = SpringWorld::new(0.0, 64);
        let agent = test_agent(&mut world);
        let before = world.velocity(agent.skeleton.torso);
        agent.nudge(
            &mut world,
            Limb::Torso,
            Vec2::new(1_000_000.0, 0.0),
            900.0,
        );
        world.step(1.0 / 60.0);
        let after = world.velocity(agent.skeleton.torso);
        // Capped at 900 on mass 2: dv <= 900/2 * dt = 7.5
        assert!(after.x - before.x <= 7.6);
        assert!(after.x > before.x);
    }

    #[test]
    fn test_deactivated_agent_absorbs_no_forces() {
        let mut world = SpringWorld::new(0.0, 64);
        let mut agent = test_agent(&mut world);
        agent.deactivate();
        agent.nudge(&mut world, Limb::Torso, Vec2::new(500.0, 0.0), 900.0);
        world.step(1.0 / 60.0);
        assert_eq!(world.velocity(agent.skeleton.torso), Vec2::ZERO);
    }

    #[test]
    fn test_deactivate_clears_combat_record() {
        let mut world = SpringWorld::new(0.0, 64);
        let mut agent = test_agent(&mut world);
        agent.combat.target = Some(AgentId::new());
        agent.combat.sequence = Some(AttackSequence::punch());
        agent.combat.is_attacking = true;
        agent.deactivate();
        assert!(agent.combat.target.is_none());
        assert!(agent.combat.sequence.is_none());
        assert!(!agent.combat.is_attacking);
        assert!(!agent.is_active());
    }

    #[test]
    fn test_live_limb_follows_sequence() {
        let mut world = SpringWorld::new(0.0, 64);
        let mut agent = test_agent(&mut world);
        assert_eq!(agent.live_limb(), None);
        let mut seq = AttackSequence::punch();
        seq.advance(0.2); // into the strike
        agent.combat.sequence = Some(seq);
        assert_eq!(agent.live_limb(), Some(Limb::RightArm));
    }
}
