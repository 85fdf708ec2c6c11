use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use npc_arena::display::{render_map, render_survivors};
use npc_arena::persistence::{load_roster, save_roster};
use npc_arena::simulation::combat::CombatPolicy;
use npc_arena::simulation::event_log::EventLog;
use npc_arena::simulation::events::FightObserver;
use npc_arena::simulation::params::Params;
use npc_arena::simulation::roster::populate;
use npc_arena::simulation::scheduler::Simulation;
use npc_arena::simulation::sinks::{ConsoleSink, FileSink};

/// Runs a timed NPC arena and reports who is left standing.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON parameter file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Roster file to start from instead of a random population
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Write survivors to this roster file at the end
    #[arg(long)]
    save: Option<PathBuf>,
    /// Run length in seconds
    #[arg(long)]
    duration: Option<u64>,
    /// Number of randomly placed agents
    #[arg(long)]
    population: Option<usize>,
    /// Kill log file
    #[arg(long)]
    log: Option<PathBuf>,
    /// Decide fights with dice instead of the matchup table
    #[arg(long)]
    dice: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut params = match &args.config {
        Some(path) => Params::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Params::default(),
    };
    if let Some(duration) = args.duration {
        params.duration_secs = duration;
    }
    if let Some(population) = args.population {
        params.population = population;
    }
    if let Some(log) = args.log {
        params.log_path = log;
    }
    if args.dice {
        params.combat_policy = CombatPolicy::DiceContest;
    }
    params.validate()?;

    let agents = match &args.roster {
        Some(path) => {
            load_roster(path).with_context(|| format!("loading roster {}", path.display()))?
        }
        None => populate(
            params.population,
            params.map_width,
            params.map_height,
            &mut rand::rng(),
        ),
    };

    let console: Arc<dyn FightObserver> = Arc::new(ConsoleSink::new());
    let file: Arc<dyn FightObserver> = Arc::new(FileSink::open(&params.log_path)?);
    let recent = Arc::new(EventLog::new(10));
    for agent in &agents {
        agent.subscribe(Arc::clone(&console));
        agent.subscribe(Arc::clone(&file));
        agent.subscribe(recent.clone());
    }

    println!("Starting game with {} NPCs", agents.len());
    let running = Simulation::new(params.clone(), agents)?.start()?;

    let started = Instant::now();
    while started.elapsed() < params.duration() {
        let snapshot = running.simulation().roster().snapshot();
        print!("{}", render_map(&snapshot, &params));
        thread::sleep(params.display_interval());
    }

    let summary = running.stop();
    println!("\n=== GAME OVER ===");
    println!("Ticks: {}, kills: {}", summary.ticks, summary.kills);
    print!("{}", render_survivors(&summary.survivors));

    let fights = recent.events();
    if !fights.is_empty() {
        println!("Last fights:");
        for fight in fights {
            let verb = if fight.won { "killed" } else { "lost to" };
            println!(
                "  {} {} {} {}",
                fight.at.format("%H:%M:%S"),
                fight.attacker,
                verb,
                fight.defender
            );
        }
    }

    if let Some(path) = &args.save {
        save_roster(path, &summary.survivors)
            .with_context(|| format!("saving roster {}", path.display()))?;
        info!(path = %path.display(), "survivors saved");
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
