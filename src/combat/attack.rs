//! Attack sequencer - multi-phase timed strikes
//!
//! An attack is an ordered list of phases (windup, strike, recovery), each
//! with a duration and a force profile on one limb. Phase advancement is
//! driven by a per-agent countdown decremented by the tick's elapsed time,
//! never by scheduled callbacks, so the sequence pauses with the simulation
//! and can never fire against a destroyed agent. During the strike phase
//! the striking limb is "live": contact with the target's torso or head at
//! sufficient relative speed deals damage.

use crate::agent::personality::Personality;
use crate::core::config::SimulationConfig;
use crate::core::types::Limb;
use serde::{Deserialize, Serialize};

// Move library force profiles (mass-units/s², along attacker->target).
const PUNCH_WINDUP_DRIVE: f32 = -220.0;
const PUNCH_STRIKE_DRIVE: f32 = 760.0;
const KICK_WINDUP_DRIVE: f32 = -260.0;
const KICK_STRIKE_DRIVE: f32 = 800.0;
const KICK_STRIKE_LIFT: f32 = 150.0;
const KICK_COUNTER_DRIVE: f32 = -240.0;
const KICK_COUNTER_LIFT: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Punch,
    Kick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    Windup,
    Strike,
    Recovery,
}

/// One timed phase of an attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackPhase {
    pub kind: PhaseKind,
    /// Seconds this phase lasts
    pub duration: f32,
    /// Limb the force profile acts on
    pub limb: Limb,
    /// Force along the attacker->target direction (negative = pull back)
    pub drive: f32,
    /// Upward force component
    pub lift: f32,
    /// Stance-limb counterforce (kicks brace on the other leg)
    pub counter_limb: Option<Limb>,
    pub counter_drive: f32,
    pub counter_lift: f32,
}

impl AttackPhase {
    fn simple(kind: PhaseKind, duration: f32, limb: Limb, drive: f32, lift: f32) -> Self {
        Self {
            kind,
            duration,
            limb,
            drive,
            lift,
            counter_limb: None,
            counter_drive: 0.0,
            counter_lift: 0.0,
        }
    }
}

/// Result of advancing a sequence by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Still inside a phase
    Running,
    /// All phases exhausted this tick; cooldown starts
    Finished,
}

/// An attack in flight; at most one per agent at any tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSequence {
    pub kind: MoveKind,
    phases: Vec<AttackPhase>,
    current: usize,
    /// Remaining time in the current phase
    pub phase_timer: f32,
}

impl AttackSequence {
    /// Straight punch: pull the arm back, drive it out, recover
    pub fn punch() -> Self {
        let phases = vec![
            AttackPhase::simple(PhaseKind::Windup, 0.2, Limb::RightArm, PUNCH_WINDUP_DRIVE, 0.0),
            AttackPhase::simple(PhaseKind::Strike, 0.2, Limb::RightArm, PUNCH_STRIKE_DRIVE, 0.0),
            AttackPhase::simple(PhaseKind::Recovery, 0.2, Limb::RightArm, 0.0, 0.0),
        ];
        Self::from_phases(MoveKind::Punch, phases)
    }

    /// Kick: slower and heavier, braced against the stance leg
    pub fn kick() -> Self {
        let strike = AttackPhase {
            kind: PhaseKind::Strike,
            duration: 0.25,
            limb: Limb::RightLeg,
            drive: KICK_STRIKE_DRIVE,
            lift: KICK_STRIKE_LIFT,
            counter_limb: Some(Limb::LeftLeg),
            counter_drive: KICK_COUNTER_DRIVE,
            counter_lift: KICK_COUNTER_LIFT,
        };
        let phases = vec![
            AttackPhase::simple(PhaseKind::Windup, 0.25, Limb::RightLeg, KICK_WINDUP_DRIVE, 0.0),
            strike,
            AttackPhase::simple(PhaseKind::Recovery, 0.3, Limb::RightLeg, 0.0, 0.0),
        ];
        Self::from_phases(MoveKind::Kick, phases)
    }

    /// Pick a move for this fighter
    ///
    /// Deterministic on purpose: aggressive fighters kick, everyone else
    /// punches. No RNG draws inside the tick pipeline.
    pub fn for_personality(personality: &Personality) -> Self {
        if personality.is_aggressive() {
            Self::kick()
        } else {
            Self::punch()
        }
    }

    fn from_phases(kind: MoveKind, phases: Vec<AttackPhase>) -> Self {
        let phase_timer = phases[0].duration;
        Self {
            kind,
            phases,
            current: 0,
            phase_timer,
        }
    }

    pub fn current_phase(&self) -> Option<&AttackPhase> {
        self.phases.get(self.current)
    }

    /// Is the striking limb currently live for contact damage?
    pub fn strike_live(&self) -> bool {
        self.current_phase()
            .map(|p| p.kind == PhaseKind::Strike)
            .unwrap_or(false)
    }

    pub fn strike_limb(&self) -> Limb {
        match self.kind {
            MoveKind::Punch => Limb::RightArm,
            MoveKind::Kick => Limb::RightLeg,
        }
    }

    /// A landed hit ends the live window; one strike deals damage once
    pub fn end_strike(&mut self) {
        if self.strike_live() {
            self.phase_timer = 0.0;
            self.advance_phase();
        }
    }

    /// Count down the phase timer by elapsed tick time
    pub fn advance(&mut self, dt: f32) -> SequenceStep {
        self.phase_timer -= dt;
        while self.phase_timer <= 0.0 {
            if !self.advance_phase() {
                return SequenceStep::Finished;
            }
        }
        SequenceStep::Running
    }

    fn advance_phase(&mut self) -> bool {
        self.current += 1;
        match self.phases.get(self.current) {
            Some(phase) => {
                self.phase_timer += phase.duration;
                true
            }
            None => false,
        }
    }
}

/// Damage for a live-limb impact, if it is hard enough to count
///
/// `damage = min(cap, speed * scale)`, gated on a minimum relative speed.
pub fn impact_damage(relative_speed: f32, config: &SimulationConfig) -> Option<f32> {
    if relative_speed <= config.min_impact_speed {
        return None;
    }
    Some((relative_speed * config.damage_scale).min(config.damage_cap))
}

/// Post-attack cooldown, shortened by reflexes
pub fn cooldown_for(reflexes: f32, config: &SimulationConfig) -> f32 {
    (config.attack_cooldown_base - reflexes * config.attack_cooldown_reflex_bonus)
        .max(config.attack_cooldown_floor)
}
