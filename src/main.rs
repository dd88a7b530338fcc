//! Command-line front end for the arena
//!
//! Runs either a fixed number of ticks (`--run`) ending in a JSON export,
//! or an interactive command loop on stdin.

use clap::Parser;
use ragdoll_arena::core::types::Vec2;
use ragdoll_arena::{run_simulation_tick, Arena, Result, SimulationConfig, SimulationEvent};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ragdoll-arena")]
#[command(about = "Autonomous ragdoll fighters balancing and brawling")]
struct Args {
    /// RNG seed for personalities and appearance
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of fighters spawned at startup
    #[arg(long, default_value_t = 2)]
    fighters: usize,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run this many ticks non-interactively, then print a state export
    #[arg(long)]
    run: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragdoll_arena=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimulationConfig::from_toml_path(path)?,
        None => SimulationConfig::default(),
    };

    let mut arena = Arena::new(config, args.seed);
    spawn_fighters(&mut arena, args.fighters);

    if let Some(ticks) = args.run {
        for _ in 0..ticks {
            let events = run_simulation_tick(&mut arena);
            report_events(&events);
        }
        println!("{}", arena.export_state()?);
        return Ok(());
    }

    interactive_loop(&mut arena)
}

fn spawn_fighters(arena: &mut Arena, count: usize) {
    let width = arena.config.arena_width;
    let height = arena.config.spawn_height;
    for i in 0..count {
        let x = width * (i + 1) as f32 / (count + 1) as f32;
        arena.spawn_agent(Vec2::new(x, height));
    }
}

fn report_events(events: &[SimulationEvent]) {
    for event in events {
        match event {
            SimulationEvent::AttackLanded {
                attacker,
                target,
                damage,
            } => {
                println!(
                    "  hit: {} -> {} for {:.1}",
                    short(attacker.0),
                    short(target.0),
                    damage
                );
            }
            SimulationEvent::Defeated { agent } => {
                println!("  defeated: {}", short(agent.0));
            }
            _ => {}
        }
    }
}

fn short(id: uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn interactive_loop(arena: &mut Arena) -> Result<()> {
    println!("ragdoll-arena interactive mode");
    println!("commands: tick | run <n> | spawn | fight | status | export | debug | clear | quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["tick"] | ["t"] => {
                let events = run_simulation_tick(arena);
                report_events(&events);
                println!("tick {}", arena.current_tick);
            }
            ["run", n] => match n.parse::<u64>() {
                Ok(ticks) => {
                    for _ in 0..ticks {
                        let events = run_simulation_tick(arena);
                        report_events(&events);
                    }
                    println!("tick {}", arena.current_tick);
                }
                Err(_) => println!("usage: run <n>"),
            },
            ["spawn"] => {
                let x = arena.config.arena_width / 2.0;
                let id = arena.spawn_agent(Vec2::new(x, arena.config.spawn_height));
                println!("spawned {}", short(id.0));
            }
            ["fight"] => {
                let active = arena.list_active_agents();
                match arena.begin_engagement(&active) {
                    Ok(()) => println!("engagement started with {} fighters", active.len()),
                    Err(err) => println!("cannot start: {}", err),
                }
            }
            ["status"] | ["s"] => {
                for snap in arena.snapshot() {
                    println!(
                        "{} {:>11} hp {:>5.1} sta {:>5.1} stab {:.2} at ({:.0}, {:.0}){}",
                        short(snap.id.0),
                        snap.state,
                        snap.vitals.health,
                        snap.vitals.stamina,
                        snap.stability,
                        snap.position.x,
                        snap.position.y,
                        if snap.active { "" } else { " [out]" },
                    );
                }
            }
            ["export"] => println!("{}", arena.export_state()?),
            ["debug"] => {
                let enabled = !arena.debug_overlay;
                arena.set_debug_overlay(enabled);
                println!("debug overlay {}", if enabled { "on" } else { "off" });
            }
            ["clear"] => {
                arena.remove_all_agents();
                println!("arena cleared");
            }
            ["quit"] | ["q"] | ["exit"] => break,
            [] => {}
            _ => println!("unknown command: {}", line.trim()),
        }
    }

    info!("shutting down");
    Ok(())
}
