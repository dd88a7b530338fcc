//! The per-tick simulation pipeline
//!
//! One call advances the world by exactly one tick:
//!
//! 1. Snapshot the positions of all active fighters (perception views).
//! 2. Per agent: perception scan (throttled), target validation, state
//!    selection, balance, locomotion or attack dispatch, vitals, timers.
//! 3. Pairwise interaction pass (attraction, shoving, healing).
//! 4. Physics step.
//! 5. Contact resolution: live-limb impacts become damage, knockback,
//!    recoil, and stagger. Defeat deactivates immediately, so a downed
//!    fighter is gone before anyone's next perception scan.
//!
//! All forces in steps 2 and 3 are additive nudges; nothing in the pipeline
//! writes positions or velocities directly.

use crate::agent::Agent;
use crate::combat::attack::{cooldown_for, impact_damage, AttackSequence, MoveKind, SequenceStep};
use crate::combat::interaction::{resolve_pair, InteractionOutcome};
use crate::combat::state::{next_state, CombatState};
use crate::control::balance::stabilize;
use crate::control::locomotion::{update_walk_speed, walk};
use crate::core::types::{AgentId, Limb, Vec2};
use crate::physics::BodyHandle;
use crate::simulation::perception::{acquire_target, scan_due, AgentView};
use crate::Arena;
use ahash::AHashMap;
use tracing::{debug, info};

/// Observable things that happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    TargetAcquired {
        agent: AgentId,
        target: AgentId,
    },
    TargetLost {
        agent: AgentId,
    },
    StateChanged {
        agent: AgentId,
        from: CombatState,
        to: CombatState,
    },
    AttackStarted {
        agent: AgentId,
        kind: MoveKind,
    },
    AttackLanded {
        attacker: AgentId,
        target: AgentId,
        damage: f32,
    },
    Defeated {
        agent: AgentId,
    },
}

/// Advance the arena by one tick
pub fn run_simulation_tick(arena: &mut Arena) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let config = arena.config.clone();
    let dt = config.tick_seconds;
    let now = arena.current_tick;
    let physics = &mut arena.physics;
    let agents = &mut arena.agents;

    // 1. Perception views: active fighters only, positions fixed for the
    //    whole tick so later force application cannot skew targeting.
    let views: Vec<AgentView> = agents
        .iter()
        .filter(|a| a.is_active())
        .map(|a| AgentView {
            id: a.id,
            position: physics.position(a.skeleton.torso),
        })
        .collect();
    let positions: AHashMap<AgentId, Vec2> = views.iter().map(|v| (v.id, v.position)).collect();

    // 2. Per-agent control pipeline.
    for agent in agents.iter_mut() {
        if !agent.is_active() {
            continue;
        }
        let my_pos = physics.position(agent.skeleton.torso);

        if scan_due(
            agent.combat.last_perception,
            now,
            config.perception_interval_ticks,
        ) {
            let found = acquire_target(agent.id, my_pos, &views, config.detection_radius);
            agent.combat.last_perception = Some(now);
            if found != agent.combat.target {
                match found {
                    Some(target) => events.push(SimulationEvent::TargetAcquired {
                        agent: agent.id,
                        target,
                    }),
                    None => events.push(SimulationEvent::TargetLost { agent: agent.id }),
                }
                agent.combat.target = found;
            }
        }

        // Held targets are re-validated on every read: a fighter defeated
        // since the last scan is dropped here, not attacked.
        if let Some(target) = agent.combat.target {
            if !positions.contains_key(&target) {
                agent.combat.target = None;
                events.push(SimulationEvent::TargetLost { agent: agent.id });
            }
        }

        let target_pos = agent
            .combat
            .target
            .and_then(|t| positions.get(&t).copied());
        let target_distance = target_pos.map(|p| my_pos.distance(p));

        let cooldown_ready =
            agent.combat.attack_cooldown <= 0.0 && agent.combat.sequence.is_none();
        let next = next_state(
            agent.combat.stagger_timer,
            target_distance,
            config.melee_range,
            cooldown_ready,
        );
        if next != agent.combat.state {
            debug!(
                agent = %agent.id.0,
                from = agent.combat.state.as_str(),
                to = next.as_str(),
                "state change"
            );
            events.push(SimulationEvent::StateChanged {
                agent: agent.id,
                from: agent.combat.state,
                to: next,
            });
            agent.combat.state = next;
            if next == CombatState::Attacking {
                let sequence = AttackSequence::for_personality(&agent.personality);
                events.push(SimulationEvent::AttackStarted {
                    agent: agent.id,
                    kind: sequence.kind,
                });
                agent.combat.sequence = Some(sequence);
                agent.combat.is_attacking = true;
            }
        }

        // Balance runs in every state, even staggered: the controller is
        // what gets a fighter back up.
        let stability = stabilize(agent, physics.as_mut(), &config);
        agent.stability = stability;

        if agent.combat.state == CombatState::Approaching {
            if let Some(p) = target_pos {
                walk(agent, physics.as_mut(), p.x, &config);
            }
        }

        agent.vitals.tick(
            agent.combat.state,
            agent.stability,
            agent.personality.endurance,
            &config,
        );
        update_walk_speed(&mut agent.movement, agent.vitals.stamina, &config);

        agent.combat.attack_cooldown = (agent.combat.attack_cooldown - dt).max(0.0);
        agent.combat.stagger_timer = (agent.combat.stagger_timer - dt).max(0.0);

        // Apply the current attack phase's force profile, then count its
        // timer down. Losing the target mid-swing does not abort the move.
        if let Some(mut sequence) = agent.combat.sequence.take() {
            let direction = target_pos
                .map(|p| if p.x >= my_pos.x { 1.0 } else { -1.0 })
                .unwrap_or(1.0);
            if let Some(phase) = sequence.current_phase() {
                let force = Vec2::new(direction * phase.drive, phase.lift);
                if !force.is_zero() {
                    agent.nudge(physics.as_mut(), phase.limb, force, config.max_limb_force);
                }
                if let Some(counter) = phase.counter_limb {
                    let counter_force =
                        Vec2::new(direction * phase.counter_drive, phase.counter_lift);
                    agent.nudge(physics.as_mut(), counter, counter_force, config.max_limb_force);
                }
            }
            match sequence.advance(dt) {
                SequenceStep::Finished => {
                    agent.combat.is_attacking = false;
                    agent.combat.attack_cooldown =
                        cooldown_for(agent.personality.reflexes, &config);
                }
                SequenceStep::Running => agent.combat.sequence = Some(sequence),
            }
        }
    }

    // 3. Pairwise interaction. Outcomes are computed against the same
    //    tick-start positions, then applied; order within the pass cannot
    //    change the result because all effects are additive.
    let mut pair_effects: Vec<(usize, usize, InteractionOutcome, Vec2)> = Vec::new();
    for i in 0..agents.len() {
        if !agents[i].is_active() {
            continue;
        }
        for j in (i + 1)..agents.len() {
            if !agents[j].is_active() {
                continue;
            }
            let pi = physics.position(agents[i].skeleton.torso);
            let pj = physics.position(agents[j].skeleton.torso);
            if pi.distance(pj) > config.interaction_radius {
                continue;
            }
            let outcome = resolve_pair(&agents[i].personality, &agents[j].personality, &config);
            let axis = (pj - pi).normalize();
            pair_effects.push((i, j, outcome, axis));
        }
    }
    for (i, j, outcome, axis) in pair_effects {
        agents[i].nudge(
            physics.as_mut(),
            Limb::Torso,
            axis * outcome.toward_force,
            config.max_limb_force,
        );
        agents[j].nudge(
            physics.as_mut(),
            Limb::Torso,
            axis * -outcome.toward_force,
            config.max_limb_force,
        );
        if outcome.heal > 0.0 {
            if agents[i].vitals.injured {
                agents[i].vitals.heal(outcome.heal);
            }
            if agents[j].vitals.injured {
                agents[j].vitals.heal(outcome.heal);
            }
        }
        if outcome.stamina_drain > 0.0 {
            agents[i].vitals.drain_stamina(outcome.stamina_drain);
            agents[j].vitals.drain_stamina(outcome.stamina_drain);
        }
    }

    // 4. Physics step.
    physics.step(dt);

    // 5. Contact resolution.
    for contact in physics.drain_contacts() {
        for (striker_body, victim_body) in [(contact.a, contact.b), (contact.b, contact.a)] {
            let Some((ai, _)) = owner_of(agents, striker_body) else {
                continue;
            };
            let Some((ti, victim_limb)) = owner_of(agents, victim_body) else {
                continue;
            };
            if ai == ti || !agents[ai].is_active() || !agents[ti].is_active() {
                continue;
            }
            // The striking limb must be live, and this contact must involve
            // that limb's body. Comparing bodies (not limb names) keeps
            // reduced skeletons honest about their aliased limbs.
            let Some(live) = agents[ai].live_limb() else {
                continue;
            };
            if agents[ai].skeleton.body(live) != striker_body {
                continue;
            }
            if !matches!(victim_limb, Limb::Torso | Limb::Head) {
                continue;
            }
            let Some(damage) = impact_damage(contact.relative_speed, &config) else {
                continue;
            };

            let from = physics.position(agents[ai].skeleton.torso);
            let to = physics.position(agents[ti].skeleton.torso);
            let direction = (to - from).normalize();
            let knockback = direction * (config.knockback_scale * contact.relative_speed);
            agents[ti].nudge(physics.as_mut(), Limb::Torso, knockback, config.max_limb_force);
            agents[ai].nudge(
                physics.as_mut(),
                Limb::Torso,
                knockback * -config.recoil_fraction,
                config.max_limb_force,
            );

            agents[ti].combat.stagger_timer = config.stagger_duration;
            if let Some(sequence) = agents[ai].combat.sequence.as_mut() {
                sequence.end_strike();
            }

            let attacker_id = agents[ai].id;
            let target_id = agents[ti].id;
            let defeated = agents[ti].vitals.take_damage(damage);
            info!(
                attacker = %attacker_id.0,
                target = %target_id.0,
                damage,
                speed = contact.relative_speed,
                "hit landed"
            );
            events.push(SimulationEvent::AttackLanded {
                attacker: attacker_id,
                target: target_id,
                damage,
            });
            if defeated {
                agents[ti].deactivate();
                info!(agent = %target_id.0, "fighter defeated");
                events.push(SimulationEvent::Defeated { agent: target_id });
            }
        }
    }

    arena.current_tick += 1;
    events
}

fn owner_of(agents: &[Agent], body: BodyHandle) -> Option<(usize, Limb)> {
    agents
        .iter()
        .enumerate()
        .find_map(|(i, a)| a.skeleton.limb_of(body).map(|limb| (i, limb)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    fn arena_with_pair(separation: f32) -> (Arena, AgentId, AgentId) {
        let mut arena = Arena::new(SimulationConfig::default(), 42);
        let a = arena.spawn_agent(Vec2::new(100.0, 90.0));
        let b = arena.spawn_agent(Vec2::new(100.0 + separation, 90.0));
        (arena, a, b)
    }

    #[test]
    fn test_tick_counter_advances() {
        let (mut arena, _, _) = arena_with_pair(150.0);
        assert_eq!(arena.current_tick, 0);
        run_simulation_tick(&mut arena);
        assert_eq!(arena.current_tick, 1);
    }

    #[test]
    fn test_fighters_in_range_acquire_each_other() {
        let (mut arena, a, b) = arena_with_pair(150.0);
        let events = run_simulation_tick(&mut arena);
        assert!(events.contains(&SimulationEvent::TargetAcquired { agent: a, target: b }));
        assert!(events.contains(&SimulationEvent::TargetAcquired { agent: b, target: a }));
        assert_eq!(arena.agent(a).unwrap().combat.state, CombatState::Approaching);
    }

    #[test]
    fn test_fighters_out_of_range_keep_balancing() {
        let (mut arena, a, b) = arena_with_pair(300.0);
        for _ in 0..30 {
            run_simulation_tick(&mut arena);
        }
        assert_eq!(arena.agent(a).unwrap().combat.target, None);
        assert_eq!(arena.agent(a).unwrap().combat.state, CombatState::Balancing);
        assert_eq!(arena.agent(b).unwrap().combat.target, None);
    }

    #[test]
    fn test_defeated_fighter_dropped_as_target() {
        let (mut arena, a, b) = arena_with_pair(150.0);
        run_simulation_tick(&mut arena);
        assert_eq!(arena.agent(a).unwrap().combat.target, Some(b));

        arena.agent_mut(b).unwrap().vitals.take_damage(150.0);
        arena.agent_mut(b).unwrap().deactivate();
        let events = run_simulation_tick(&mut arena);
        assert!(events.contains(&SimulationEvent::TargetLost { agent: a }));
        assert_eq!(arena.agent(a).unwrap().combat.target, None);
    }

    #[test]
    fn test_perception_is_throttled() {
        let (mut arena, a, _) = arena_with_pair(150.0);
        run_simulation_tick(&mut arena);
        let first_scan = arena.agent(a).unwrap().combat.last_perception;
        assert_eq!(first_scan, Some(0));
        // The next few ticks must not rescan.
        for _ in 0..5 {
            run_simulation_tick(&mut arena);
        }
        assert_eq!(arena.agent(a).unwrap().combat.last_perception, first_scan);
        for _ in 0..5 {
            run_simulation_tick(&mut arena);
        }
        assert!(arena.agent(a).unwrap().combat.last_perception > first_scan);
    }

    #[test]
    fn test_at_most_one_sequence_in_flight() {
        let (mut arena, a, b) = arena_with_pair(60.0);
        for _ in 0..300 {
            run_simulation_tick(&mut arena);
            for id in [a, b] {
                let agent = arena.agent(id).unwrap();
                if agent.combat.sequence.is_some() {
                    assert!(agent.combat.is_attacking);
                }
                // A fresh attack can only start with no sequence in flight;
                // the cooldown field enforces spacing between them.
                if agent.combat.attack_cooldown > 0.0 && !agent.combat.is_attacking {
                    assert!(agent.combat.sequence.is_none());
                }
            }
        }
    }

    #[test]
    fn test_inactive_agents_are_skipped_entirely() {
        let (mut arena, a, b) = arena_with_pair(150.0);
        arena.agent_mut(a).unwrap().deactivate();
        for _ in 0..20 {
            let events = run_simulation_tick(&mut arena);
            for event in &events {
                assert!(!matches!(
                    event,
                    SimulationEvent::TargetAcquired { target, .. } if *target == a
                ));
            }
        }
        // The survivor saw nothing to fight.
        assert_eq!(arena.agent(b).unwrap().combat.target, None);
    }
}
