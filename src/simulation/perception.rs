//! Perception - throttled nearest-fighter scans
//!
//! Scans run every few ticks, not every tick, so targeting stays committed
//! rather than twitchy. Only active fighters are visible: a defeated agent
//! never appears in a scan, and a held target that has since been defeated
//! is dropped at the next validation, not here.

use crate::core::types::{AgentId, Tick, Vec2};

/// What one agent can see of another: identity and torso position only
#[derive(Debug, Clone, Copy)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vec2,
}

/// Is this agent due for a perception scan?
pub fn scan_due(last_scan: Option<Tick>, now: Tick, interval_ticks: u64) -> bool {
    match last_scan {
        None => true,
        Some(last) => now.saturating_sub(last) >= interval_ticks,
    }
}

/// Nearest visible fighter within the detection radius
///
/// Strictly-closer comparison, so among equidistant candidates the first
/// in registry order wins deterministically.
pub fn acquire_target(
    seeker: AgentId,
    position: Vec2,
    others: &[AgentView],
    detection_radius: f32,
) -> Option<AgentId> {
    let mut best: Option<(AgentId, f32)> = None;
    for view in others {
        if view.id == seeker {
            continue;
        }
        let distance = position.distance(view.position);
        if distance > detection_radius {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((view.id, distance)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: AgentId, x: f32) -> AgentView {
        AgentView {
            id,
            position: Vec2::new(x, 90.0),
        }
    }

    #[test]
    fn test_scan_due_honors_interval() {
        assert!(scan_due(None, 0, 7));
        assert!(!scan_due(Some(10), 12, 7));
        assert!(scan_due(Some(10), 17, 7));
    }

    #[test]
    fn test_nearest_fighter_wins() {
        let seeker = AgentId::new();
        let near = AgentId::new();
        let far = AgentId::new();
        let others = vec![view(far, 150.0), view(near, 50.0)];
        assert_eq!(
            acquire_target(seeker, Vec2::new(0.0, 90.0), &others, 200.0),
            Some(near)
        );
    }

    #[test]
    fn test_out_of_radius_is_invisible() {
        let seeker = AgentId::new();
        let distant = AgentId::new();
        let others = vec![view(distant, 250.0)];
        assert_eq!(
            acquire_target(seeker, Vec2::new(0.0, 90.0), &others, 200.0),
            None
        );
    }

    #[test]
    fn test_seeker_never_targets_itself() {
        let seeker = AgentId::new();
        let others = vec![view(seeker, 0.0)];
        assert_eq!(
            acquire_target(seeker, Vec2::new(0.0, 90.0), &others, 200.0),
            None
        );
    }

    #[test]
    fn test_equidistant_tie_goes_to_first() {
        let seeker = AgentId::new();
        let first = AgentId::new();
        let second = AgentId::new();
        let others = vec![view(first, 100.0), view(second, -100.0)];
        assert_eq!(
            acquire_target(seeker, Vec2::new(0.0, 90.0), &others, 200.0),
            Some(first)
        );
    }
}
