//! Pairwise interaction resolver
//!
//! Any two fighters within the interaction radius exert personality-driven
//! influence on each other, independent of (and additive with) whatever
//! their combat state machines are doing. Compatibility is the mean
//! absolute difference across the five personality traits: similar
//! fighters cooperate, opposites clash, everyone else is merely curious.

use crate::agent::personality::Personality;
use crate::core::config::SimulationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Drift together; injured partners are healed
    Cooperate,
    /// Shove apart; both sides burn stamina
    Clash,
    /// Weak mutual approach, nothing else
    Curiosity,
}

/// Resolved effect of one fighter pair for one tick
///
/// Symmetric by construction: both fighters receive `toward_force` along
/// their own axis toward the other, and both pay `stamina_drain`. Healing
/// applies only to the injured side(s).
#[derive(Debug, Clone, Copy)]
pub struct InteractionOutcome {
    pub kind: InteractionKind,
    /// Torso force along the axis toward the partner; negative repels
    pub toward_force: f32,
    /// Health restored this tick to an injured participant
    pub heal: f32,
    /// Stamina cost paid by both participants this tick
    pub stamina_drain: f32,
}

/// Map a compatibility score onto an interaction band
pub fn resolve_interaction(compatibility: f32, config: &SimulationConfig) -> InteractionOutcome {
    if compatibility < config.cooperate_below {
        InteractionOutcome {
            kind: InteractionKind::Cooperate,
            toward_force: config.attraction_force,
            heal: config.interaction_heal_rate,
            stamina_drain: 0.0,
        }
    } else if compatibility > config.clash_above {
        InteractionOutcome {
            kind: InteractionKind::Clash,
            toward_force: -config.clash_force,
            heal: 0.0,
            stamina_drain: config.clash_stamina_drain,
        }
    } else {
        InteractionOutcome {
            kind: InteractionKind::Curiosity,
            toward_force: config.curiosity_force,
            heal: 0.0,
            stamina_drain: 0.0,
        }
    }
}

/// Resolve the interaction for a concrete fighter pair
pub fn resolve_pair(
    a: &Personality,
    b: &Personality,
    config: &SimulationConfig,
) -> InteractionOutcome {
    resolve_interaction(a.compatibility(b), config)
}
