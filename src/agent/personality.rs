//! Fixed per-agent personality traits
//!
//! Sampled once at creation and immutable afterwards. Traits bias the
//! balance threshold, gait drive, attack cooldown, and pairwise
//! interactions; nothing else in the agent is allowed to mutate them.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Behavioral traits, all in [0, 1]
///
/// Reflexes and endurance are floored (0.5 and 0.6) so every fighter can
/// at least stand up and throw a punch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Personality {
    /// Drive to close distance and attack
    pub aggression: f32,
    /// Willingness to stay engaged when hurt
    pub courage: f32,
    /// Quality of engagement decisions (reserved for tuning)
    pub intelligence: f32,
    /// Shortens the attack cooldown
    pub reflexes: f32,
    /// Strengthens balance recovery and stamina regeneration
    pub endurance: f32,
}

impl Personality {
    /// Sample a fresh personality from the world RNG
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            aggression: rng.gen::<f32>(),
            courage: rng.gen::<f32>(),
            intelligence: rng.gen::<f32>(),
            reflexes: 0.5 + rng.gen::<f32>() * 0.5,
            endurance: 0.6 + rng.gen::<f32>() * 0.4,
        }
    }

    /// Mean absolute trait difference, in [0, 1]
    ///
    /// Low = kindred spirits (cooperation), high = friction (clashes).
    pub fn compatibility(&self, other: &Personality) -> f32 {
        ((self.aggression - other.aggression).abs()
            + (self.courage - other.courage).abs()
            + (self.intelligence - other.intelligence).abs()
            + (self.reflexes - other.reflexes).abs()
            + (self.endurance - other.endurance).abs())
            / 5.0
    }

    /// Aggressive fighters favor kicks over punches
    pub fn is_aggressive(&self) -> bool {
        self.aggression > 0.7
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sampled_traits_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let p = Personality::sample(&mut rng);
            assert!((0.0..=1.0).contains(&p.aggression));
            assert!((0.0..=1.0).contains(&p.courage));
            assert!((0.0..=1.0).contains(&p.intelligence));
            assert!((0.5..=1.0).contains(&p.reflexes));
            assert!((0.6..=1.0).contains(&p.endurance));
        }
    }

    #[test]
    fn test_sampling_is_seed_deterministic() {
        let a = Personality::sample(&mut ChaCha8Rng::seed_from_u64(42));
        let b = Personality::sample(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a.aggression, b.aggression);
        assert_eq!(a.endurance, b.endurance);
    }

    #[test]
    fn test_compatibility_symmetric_and_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = Personality::sample(&mut rng);
        let b = Personality::sample(&mut rng);
        let ab = a.compatibility(&b);
        assert_eq!(ab, b.compatibility(&a));
        assert!((0.0..=1.0).contains(&ab));
        assert_eq!(a.compatibility(&a), 0.0);
    }
}
