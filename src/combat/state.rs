//! Combat finite-state machine
//!
//! Evaluated once per tick, after perception. STAGGERED short-circuits
//! everything else; the remaining transitions are a pure function of target
//! presence, distance, and the attack cooldown.

use serde::{Deserialize, Serialize};

/// Behavioral state of a fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatState {
    /// No target worth engaging; stand and recover
    #[default]
    Balancing,
    /// Target acquired beyond melee range; walk it down
    Approaching,
    /// Target in melee range with the cooldown elapsed; a sequence runs
    Attacking,
    /// Lost control after taking a hit; overrides every other state
    Staggered,
}

impl CombatState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombatState::Balancing => "BALANCING",
            CombatState::Approaching => "APPROACHING",
            CombatState::Attacking => "ATTACKING",
            CombatState::Staggered => "STAGGERED",
        }
    }
}

/// Select the next state
///
/// `target_distance` is `None` when there is no valid target. The caller
/// starts an attack sequence on a transition into [`CombatState::Attacking`].
pub fn next_state(
    stagger_timer: f32,
    target_distance: Option<f32>,
    melee_range: f32,
    cooldown_elapsed: bool,
) -> CombatState {
    if stagger_timer > 0.0 {
        return CombatState::Staggered;
    }

    match target_distance {
        None => CombatState::Balancing,
        Some(distance) if distance > melee_range => CombatState::Approaching,
        Some(_) if cooldown_elapsed => CombatState::Attacking,
        // In range but on cooldown: hold ground and keep balance.
        Some(_) => CombatState::Balancing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MELEE: f32 = 80.0;

    #[test]
    fn test_stagger_overrides_everything() {
        assert_eq!(
            next_state(0.2, Some(10.0), MELEE, true),
            CombatState::Staggered
        );
        assert_eq!(next_state(0.2, None, MELEE, false), CombatState::Staggered);
    }

    #[test]
    fn test_no_target_balances() {
        assert_eq!(next_state(0.0, None, MELEE, true), CombatState::Balancing);
    }

    #[test]
    fn test_distant_target_approaches() {
        assert_eq!(
            next_state(0.0, Some(150.0), MELEE, true),
            CombatState::Approaching
        );
    }

    #[test]
    fn test_close_target_off_cooldown_attacks() {
        assert_eq!(
            next_state(0.0, Some(60.0), MELEE, true),
            CombatState::Attacking
        );
    }

    #[test]
    fn test_close_target_on_cooldown_balances() {
        assert_eq!(
            next_state(0.0, Some(60.0), MELEE, false),
            CombatState::Balancing
        );
    }
}
