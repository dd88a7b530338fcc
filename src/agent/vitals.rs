//! Vitals - health, stamina, fear, energy
//!
//! All counters clamp to [0, 100] every tick. Health regenerates only while
//! BALANCING; stamina drains by activity and regenerates with endurance;
//! fear spikes on damage and fades; energy drains under exertion and
//! recovers at rest.

use crate::combat::state::CombatState;
use crate::core::config::SimulationConfig;
use serde::{Deserialize, Serialize};

pub const VITAL_MAX: f32 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub stamina: f32,
    pub fear: f32,
    pub energy: f32,
    /// Hysteresis flag: set below health 50, cleared above 80
    pub injured: bool,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: VITAL_MAX,
            stamina: VITAL_MAX,
            fear: 0.0,
            energy: VITAL_MAX,
            injured: false,
        }
    }
}

impl Vitals {
    /// Per-tick regeneration, drain, and clamping
    pub fn tick(
        &mut self,
        state: CombatState,
        stability: f32,
        endurance: f32,
        config: &SimulationConfig,
    ) {
        if state == CombatState::Balancing && self.health < VITAL_MAX && self.health > 0.0 {
            self.health += config.health_regen;
        }

        if self.stamina < VITAL_MAX {
            self.stamina += config.stamina_regen_base + endurance * config.stamina_regen_endurance;
        }

        let mut drain = match state {
            CombatState::Balancing => 0.05,
            CombatState::Approaching => 0.2,
            CombatState::Attacking => 0.5,
            CombatState::Staggered => 0.1,
        };
        // Fighting to stay upright is itself exhausting.
        if stability < config.low_stability_threshold {
            drain *= config.low_stability_drain_mult;
        }
        self.stamina -= drain;

        if self.fear > 0.0 {
            self.fear -= 0.1;
        }
        // Exertion spends energy; rest recovers it.
        match state {
            CombatState::Approaching => self.energy -= 0.1,
            CombatState::Attacking => self.energy -= 0.3,
            _ => {
                if self.energy < VITAL_MAX {
                    self.energy += 0.2;
                }
            }
        }

        self.clamp();
        self.update_injury_flag();
    }

    /// Subtract health and spike fear; returns true when this hit defeats
    ///
    /// Permanent deactivation on defeat is the owner's job - vitals only
    /// report it.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        self.fear += amount;
        self.clamp();
        self.update_injury_flag();
        self.health <= 0.0
    }

    /// Restore health (cooperation healing); no effect at zero health
    pub fn heal(&mut self, amount: f32) {
        if self.health > 0.0 {
            self.health += amount;
            self.clamp();
            self.update_injury_flag();
        }
    }

    pub fn drain_stamina(&mut self, amount: f32) {
        self.stamina -= amount;
        self.clamp();
    }

    pub fn is_incapacitated(&self) -> bool {
        self.health <= 0.0
    }

    fn clamp(&mut self) {
        self.health = self.health.clamp(0.0, VITAL_MAX);
        self.stamina = self.stamina.clamp(0.0, VITAL_MAX);
        self.fear = self.fear.clamp(0.0, VITAL_MAX);
        self.energy = self.energy.clamp(0.0, VITAL_MAX);
    }

    fn update_injury_flag(&mut self) {
        if self.health < 50.0 {
            self.injured = true;
        } else if self.health > 80.0 {
            self.injured = false;
        }
    }
}
