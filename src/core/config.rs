//! Simulation configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact with each other. Distances are in world units
//! (roughly pixels of the reference arena), forces in mass-units/s².

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the arena simulation
///
/// These values have been tuned to produce stable, human-looking fights.
/// Changing them will affect pacing, gait quality, and balance recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TIME ===
    /// Seconds of simulated time advanced per tick
    ///
    /// Every timer (attack phases, cooldowns, stagger) counts down by this
    /// amount per tick, so the whole simulation pauses and resumes cleanly.
    pub tick_seconds: f32,

    // === PERCEPTION ===
    /// Ticks between perception scans per agent
    ///
    /// Perception is deliberately coarse-grained: at 7 ticks (~120 ms) an
    /// agent commits to a target instead of twitch-switching every frame.
    pub perception_interval_ticks: u64,

    /// Maximum torso-to-torso distance at which a target is acquired
    pub detection_radius: f32,

    // === COMBAT ===
    /// Torso-to-torso distance below which an attack can start
    pub melee_range: f32,

    /// Cap on damage from a single impact
    pub damage_cap: f32,

    /// Damage per unit of relative impact speed
    pub damage_scale: f32,

    /// Minimum relative impact speed for a live limb to register damage
    ///
    /// Filters out grazing or resting contact between fighters.
    pub min_impact_speed: f32,

    /// Base attack cooldown in seconds; reflexes shorten it
    ///
    /// Effective cooldown = max(floor, base - reflexes * reflex_bonus).
    pub attack_cooldown_base: f32,

    /// Lower bound on the attack cooldown in seconds
    pub attack_cooldown_floor: f32,

    /// Seconds of cooldown removed per point of reflexes
    pub attack_cooldown_reflex_bonus: f32,

    /// Seconds of lost control after taking a hit
    pub stagger_duration: f32,

    /// Knockback force on the target torso per unit of impact speed
    pub knockback_scale: f32,

    /// Fraction of the knockback applied to the attacker as recoil
    pub recoil_fraction: f32,

    // === BALANCE ===
    /// Torso tilt (radians) above which righting forces engage
    ///
    /// Endurance raises the effective threshold slightly: tougher fighters
    /// tolerate more lean before spending effort on correction.
    pub balance_angle_threshold: f32,

    /// Horizontal COM offset from the support base that triggers leg correction
    pub com_offset_threshold: f32,

    /// Gain of the torso-righting force (scaled by endurance and -angle)
    pub torso_righting_gain: f32,

    /// Fraction of the righting force mirrored onto each arm (lever assist)
    pub arm_assist_fraction: f32,

    /// Gain of the symmetric leg force pulling the base under the COM
    pub leg_correction_gain: f32,

    /// How far a leg may hang below the torso before lift engages
    pub leg_drop_limit: f32,

    /// Continuous lift force keeping feet under the body
    pub leg_lift_force: f32,

    /// Nominal lateral offset of each leg from the torso centerline
    pub leg_nominal_offset: f32,

    /// Lateral drift from the nominal offset before realignment engages
    pub leg_lateral_limit: f32,

    /// Gain of the lateral leg realignment force
    pub leg_realign_gain: f32,

    // === LOCOMOTION ===
    /// Walk phase advance per invocation (radians)
    ///
    /// Higher = faster cadence. At 0.15 a full stride takes ~42 ticks.
    pub walk_phase_rate: f32,

    /// Peak alternating leg force at full stability
    pub walk_force: f32,

    /// Fraction of leg force applied counter-phase to the arms
    pub arm_swing_fraction: f32,

    /// Forward drive force on the torso (scaled by aggression and walk speed)
    ///
    /// Tuned together with `walk_force` so two fresh fighters 150 units
    /// apart close to melee range and land a first hit inside 2 seconds.
    pub torso_drive_force: f32,

    /// Stamina below which the walk-speed multiplier decays
    ///
    /// Couples exhaustion to mobility: a drained fighter slows down, which
    /// lowers stamina drain, which lets the multiplier recover.
    pub low_stamina_threshold: f32,

    // === VITALS ===
    /// Health regenerated per tick while BALANCING and below max
    pub health_regen: f32,

    /// Base stamina regeneration per tick
    pub stamina_regen_base: f32,

    /// Extra stamina regeneration per point of endurance
    pub stamina_regen_endurance: f32,

    /// Stability below which stamina drain is amplified
    pub low_stability_threshold: f32,

    /// Drain multiplier applied when stability is low
    pub low_stability_drain_mult: f32,

    // === INTERACTION ===
    /// Torso-to-torso distance within which pairwise interaction applies
    pub interaction_radius: f32,

    /// Compatibility below this: cooperate (attraction + mutual healing)
    pub cooperate_below: f32,

    /// Compatibility above this: clash (repulsion + stamina drain)
    pub clash_above: f32,

    /// Attraction force between compatible fighters
    pub attraction_force: f32,

    /// Shoving force between incompatible fighters
    pub clash_force: f32,

    /// Weak approach force for the neutral "curiosity" band
    pub curiosity_force: f32,

    /// Health restored per tick to an injured fighter near a compatible one
    pub interaction_heal_rate: f32,

    /// Stamina drained per tick from both sides of a clash
    pub clash_stamina_drain: f32,

    // === PHYSICS / SAFETY ===
    /// Downward gravity acceleration
    pub gravity: f32,

    /// Hard cap on any single force magnitude applied to a limb
    ///
    /// Any computed force above this is scaled down, never rejected.
    pub max_limb_force: f32,

    /// Body capacity of the physics backend
    ///
    /// Spawns past this point degrade to reduced-fidelity skeletons instead
    /// of failing.
    pub max_bodies: usize,

    // === WORLD ===
    /// Arena width used to space fighters when an engagement begins
    pub arena_width: f32,

    /// Height above the ground at which new skeletons are created
    pub spawn_height: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 1.0 / 60.0,

            perception_interval_ticks: 7,
            detection_radius: 200.0,

            melee_range: 80.0,
            damage_cap: 15.0,
            damage_scale: 3.0,
            min_impact_speed: 2.0,
            attack_cooldown_base: 0.8,
            attack_cooldown_floor: 0.3,
            attack_cooldown_reflex_bonus: 0.2,
            stagger_duration: 0.5,
            knockback_scale: 6.0,
            recoil_fraction: 0.3,

            balance_angle_threshold: 0.2,
            com_offset_threshold: 10.0,
            torso_righting_gain: 260.0,
            arm_assist_fraction: 0.3,
            leg_correction_gain: 3.0,
            leg_drop_limit: 70.0,
            leg_lift_force: 90.0,
            leg_nominal_offset: 15.0,
            leg_lateral_limit: 20.0,
            leg_realign_gain: 2.0,

            walk_phase_rate: 0.15,
            walk_force: 190.0,
            arm_swing_fraction: 0.3,
            torso_drive_force: 600.0,
            low_stamina_threshold: 20.0,

            health_regen: 0.1,
            stamina_regen_base: 0.5,
            stamina_regen_endurance: 0.3,
            low_stability_threshold: 0.5,
            low_stability_drain_mult: 1.5,

            interaction_radius: 100.0,
            cooperate_below: 0.3,
            clash_above: 0.7,
            attraction_force: 20.0,
            clash_force: 120.0,
            curiosity_force: 8.0,
            interaction_heal_rate: 0.5,
            clash_stamina_drain: 1.0,

            gravity: 400.0,
            max_limb_force: 900.0,
            max_bodies: 4096,

            arena_width: 800.0,
            spawn_height: 90.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_toml_path(path: &Path) -> crate::core::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config
            .validate()
            .map_err(crate::core::error::ArenaError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_seconds <= 0.0 {
            return Err("tick_seconds must be positive".into());
        }

        // The FSM assumes melee range sits inside the detection radius,
        // otherwise an agent could be ordered to attack what it cannot see.
        if self.melee_range >= self.detection_radius {
            return Err(format!(
                "melee_range ({}) must be < detection_radius ({})",
                self.melee_range, self.detection_radius
            ));
        }

        if self.cooperate_below >= self.clash_above {
            return Err(format!(
                "cooperate_below ({}) must be < clash_above ({})",
                self.cooperate_below, self.clash_above
            ));
        }

        if self.attack_cooldown_floor > self.attack_cooldown_base {
            return Err(format!(
                "attack_cooldown_floor ({}) must be <= attack_cooldown_base ({})",
                self.attack_cooldown_floor, self.attack_cooldown_base
            ));
        }

        if self.max_limb_force <= 0.0 {
            return Err("max_limb_force must be positive".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_melee_inside_detection_enforced() {
        let mut config = SimulationConfig::default();
        config.melee_range = config.detection_radius + 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_compatibility_bands_ordered() {
        let mut config = SimulationConfig::default();
        config.cooperate_below = 0.8;
        config.clash_above = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SimulationConfig = toml::from_str("detection_radius = 300.0").unwrap();
        assert_eq!(config.detection_radius, 300.0);
        assert_eq!(config.melee_range, SimulationConfig::default().melee_range);
    }
}
