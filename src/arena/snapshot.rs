//! Read-only snapshot and export types
//!
//! Everything an observer (renderer, log consumer, test harness) needs,
//! decoupled from the live registry so exporting never borrows the
//! simulation mutably.

use crate::agent::appearance::Appearance;
use crate::agent::personality::Personality;
use crate::agent::vitals::Vitals;
use crate::agent::Agent;
use crate::core::types::{AgentId, Limb, Tick, Vec2};
use crate::physics::SkeletonWorld;
use serde::{Deserialize, Serialize};

/// One fighter's observable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub active: bool,
    /// Combat state name, e.g. "APPROACHING"
    pub state: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub stability: f32,
    pub vitals: Vitals,
    pub personality: Personality,
    pub appearance: Appearance,
}

impl AgentSnapshot {
    pub fn capture(agent: &Agent, world: &dyn SkeletonWorld) -> Self {
        Self {
            id: agent.id,
            active: agent.is_active(),
            state: agent.combat.state.as_str().to_string(),
            position: world.position(agent.skeleton.torso),
            velocity: world.velocity(agent.skeleton.torso),
            stability: agent.stability,
            vitals: agent.vitals.clone(),
            personality: agent.personality,
            appearance: agent.appearance.clone(),
        }
    }
}

/// Per-limb detail, included only when the debug overlay is on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimbSnapshot {
    pub limb: Limb,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugSnapshot {
    pub id: AgentId,
    pub torso_angle: f32,
    pub limbs: Vec<LimbSnapshot>,
}

impl DebugSnapshot {
    pub fn capture(agent: &Agent, world: &dyn SkeletonWorld) -> Self {
        let limbs = Limb::ALL
            .iter()
            .map(|limb| {
                let body = agent.skeleton.body(*limb);
                LimbSnapshot {
                    limb: *limb,
                    position: world.position(body),
                    velocity: world.velocity(body),
                }
            })
            .collect();
        Self {
            id: agent.id,
            torso_angle: world.angle(agent.skeleton.torso),
            limbs,
        }
    }
}

/// Full serializable world state at one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateExport {
    pub tick: Tick,
    pub agents: Vec<AgentSnapshot>,
    /// Present only when the debug overlay is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<DebugSnapshot>>,
}
