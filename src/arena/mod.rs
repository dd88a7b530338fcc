//! Arena - world container and fighter registry
//!
//! Owns the physics backend, the agent registry, the tick counter, and the
//! seeded RNG. All identity flows through [`AgentId`]; positional lookups
//! go through the registry index, never through raw Vec positions held
//! across mutations.

pub mod snapshot;

use crate::agent::appearance::Appearance;
use crate::agent::personality::Personality;
use crate::agent::Agent;
use crate::arena::snapshot::{AgentSnapshot, DebugSnapshot, StateExport};
use crate::core::config::SimulationConfig;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{AgentId, Tick, Vec2};
use crate::physics::spring::SpringWorld;
use crate::physics::SkeletonWorld;
use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

pub struct Arena {
    pub config: SimulationConfig,
    pub physics: Box<dyn SkeletonWorld>,
    pub agents: Vec<Agent>,
    index: AHashMap<AgentId, usize>,
    pub current_tick: Tick,
    pub debug_overlay: bool,
    rng: ChaCha8Rng,
}

impl Arena {
    /// Create an arena with the default spring-mass backend
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        let physics = Box::new(SpringWorld::new(config.gravity, config.max_bodies));
        Self::with_physics(config, seed, physics)
    }

    pub fn with_physics(
        config: SimulationConfig,
        seed: u64,
        physics: Box<dyn SkeletonWorld>,
    ) -> Self {
        Self {
            config,
            physics,
            agents: Vec::new(),
            index: AHashMap::new(),
            current_tick: 0,
            debug_overlay: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Spawn a fighter with sampled personality and appearance
    ///
    /// Skeleton creation failure (body capacity exhausted) degrades to a
    /// reduced-fidelity skeleton rather than refusing the spawn.
    pub fn spawn_agent(&mut self, position: Vec2) -> AgentId {
        let personality = Personality::sample(&mut self.rng);
        let appearance = Appearance::sample(&mut self.rng);
        let walk_speed = 0.8 + self.rng.gen::<f32>() * 0.4;

        let skeleton = match self.physics.create_skeleton(position, appearance.size) {
            Ok(skeleton) => skeleton,
            Err(err) => {
                warn!(error = %err, "skeleton creation failed, spawning reduced fighter");
                self.physics.create_reduced_skeleton(position, appearance.size)
            }
        };

        let agent = Agent::new(AgentId::new(), personality, appearance, skeleton, walk_speed);
        let id = agent.id;
        info!(
            agent = %id.0,
            x = position.x,
            aggression = agent.personality.aggression,
            reduced = agent.skeleton.reduced,
            "fighter spawned"
        );
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        id
    }

    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.index
            .get(&id)
            .map(|i| &self.agents[*i])
            .ok_or(ArenaError::AgentNotFound(id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        match self.index.get(&id) {
            Some(i) => Ok(&mut self.agents[*i]),
            None => Err(ArenaError::AgentNotFound(id)),
        }
    }

    /// Ids of all fighters still in the fight, in registry order
    pub fn list_active_agents(&self) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|a| a.is_active())
            .map(|a| a.id)
            .collect()
    }

    /// Reset the named fighters and space them evenly across the arena
    ///
    /// Unknown ids fail the call; defeated fighters among the named are
    /// skipped. Fewer than two live participants is an error.
    pub fn begin_engagement(&mut self, ids: &[AgentId]) -> Result<()> {
        let mut participants = Vec::new();
        for id in ids {
            let agent = self.agent(*id)?;
            if agent.is_active() {
                participants.push(*id);
            }
        }
        if participants.len() < 2 {
            return Err(ArenaError::NotEnoughFighters {
                active: participants.len(),
            });
        }

        let count = participants.len();
        for (i, id) in participants.iter().enumerate() {
            let spacing = self.config.arena_width / (count + 1) as f32;
            let origin = Vec2::new(spacing * (i + 1) as f32, self.config.spawn_height);
            let agent = self.agent_mut(*id)?;
            agent.reset_for_engagement();
            let skeleton = agent.skeleton.clone();
            self.physics.reposition_skeleton(&skeleton, origin);
        }
        info!(fighters = count, "engagement started");
        Ok(())
    }

    /// Destroy every skeleton and empty the registry
    pub fn remove_all_agents(&mut self) {
        for agent in &self.agents {
            self.physics.destroy_skeleton(&agent.skeleton);
        }
        let removed = self.agents.len();
        self.agents.clear();
        self.index.clear();
        info!(removed, "arena cleared");
    }

    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    /// Observable state of every fighter
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .map(|a| AgentSnapshot::capture(a, self.physics.as_ref()))
            .collect()
    }

    /// Full world state as pretty-printed JSON
    ///
    /// Per-limb detail is included only while the debug overlay is on.
    pub fn export_state(&self) -> Result<String> {
        let debug = self.debug_overlay.then(|| {
            self.agents
                .iter()
                .map(|a| DebugSnapshot::capture(a, self.physics.as_ref()))
                .collect()
        });
        let export = StateExport {
            tick: self.current_tick,
            agents: self.snapshot(),
            debug,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(SimulationConfig::default(), 42)
    }

    #[test]
    fn test_spawn_registers_agent() {
        let mut arena = arena();
        let id = arena.spawn_agent(Vec2::new(100.0, 90.0));
        assert!(arena.agent(id).is_ok());
        assert_eq!(arena.list_active_agents(), vec![id]);
    }

    #[test]
    fn test_spawn_past_capacity_degrades_to_reduced() {
        let mut config = SimulationConfig::default();
        config.max_bodies = 8; // room for one full skeleton only
        let mut arena = Arena::new(config, 42);
        let full = arena.spawn_agent(Vec2::new(100.0, 90.0));
        let cramped = arena.spawn_agent(Vec2::new(300.0, 90.0));
        assert!(!arena.agent(full).unwrap().skeleton.reduced);
        assert!(arena.agent(cramped).unwrap().skeleton.reduced);
    }

    #[test]
    fn test_unknown_agent_is_an_error() {
        let arena = arena();
        assert!(matches!(
            arena.agent(AgentId::new()),
            Err(ArenaError::AgentNotFound(_))
        ));
    }

    #[test]
    fn test_engagement_needs_two_fighters() {
        let mut arena = arena();
        let lonely = arena.spawn_agent(Vec2::new(100.0, 90.0));
        assert!(matches!(
            arena.begin_engagement(&[lonely]),
            Err(ArenaError::NotEnoughFighters { active: 1 })
        ));
    }

    #[test]
    fn test_engagement_spaces_fighters_apart() {
        let mut arena = arena();
        let a = arena.spawn_agent(Vec2::new(0.0, 90.0));
        let b = arena.spawn_agent(Vec2::new(0.0, 90.0));
        arena.begin_engagement(&[a, b]).unwrap();
        let pa = arena.physics.position(arena.agent(a).unwrap().skeleton.torso);
        let pb = arena.physics.position(arena.agent(b).unwrap().skeleton.torso);
        assert!((pa.x - pb.x).abs() > 100.0);
    }

    #[test]
    fn test_remove_all_empties_registry() {
        let mut arena = arena();
        arena.spawn_agent(Vec2::new(100.0, 90.0));
        arena.spawn_agent(Vec2::new(300.0, 90.0));
        arena.remove_all_agents();
        assert!(arena.agents.is_empty());
        assert!(arena.list_active_agents().is_empty());
    }

    #[test]
    fn test_export_debug_section_gated() {
        let mut arena = arena();
        arena.spawn_agent(Vec2::new(100.0, 90.0));
        let plain = arena.export_state().unwrap();
        assert!(!plain.contains("\"debug\""));
        arena.set_debug_overlay(true);
        let detailed = arena.export_state().unwrap();
        assert!(detailed.contains("\"debug\""));
        assert!(detailed.contains("torso_angle"));
    }
}
