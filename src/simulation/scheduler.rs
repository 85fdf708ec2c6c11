//! Simulation context and its two worker loops.
//!
//! The movement driver periodically relocates all living agents under
//! exclusive roster access, then scans a snapshot for pairs in range and
//! queues a combat task per pair. The combat worker pops tasks, re-validates
//! them, and hands them to the resolver. Stopping first halts the driver and
//! waits for it, so no scan can enqueue after that point. Only then is the
//! queue switched to draining: the worker finishes what is queued and exits.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use super::agent::{Agent, AgentSnapshot};
use super::combat::{self, FightOutcome};
use super::events::KillEvent;
use super::geometric_utils::in_bounds;
use super::params::Params;
use super::queue::{CombatQueue, CombatTask};
use super::roster::Roster;
use super::spatial::SpatialIndex;
use crate::error::SimError;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Normal operation.
    Ticking,
    /// Stop requested; queued work is finishing.
    Draining,
}

/// Totals reported when a run ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Movement ticks completed.
    pub ticks: u64,
    /// Kills recorded by the combat worker.
    pub kills: usize,
    /// Living agents at the end, in roster order.
    pub survivors: Vec<AgentSnapshot>,
    /// Tasks still queued when the report was taken.
    pub unprocessed: usize,
}

/// Owns the roster, the combat queue, and the run counters.
pub struct Simulation {
    params: Params,
    roster: Roster,
    queue: CombatQueue,
    stopping: AtomicBool,
    ticks: AtomicU64,
    kills: AtomicUsize,
}

impl Simulation {
    /// Creates a simulation over `agents`.
    ///
    /// Fails if the parameters are unusable or an agent starts outside the map.
    pub fn new(params: Params, agents: Vec<Arc<Agent>>) -> Result<Self, SimError> {
        params.validate()?;
        for agent in &agents {
            let pos = agent.position();
            if !in_bounds(pos, params.map_width, params.map_height) {
                return Err(SimError::OutOfBounds {
                    name: agent.name().to_string(),
                    x: pos.x,
                    y: pos.y,
                });
            }
        }

        Ok(Self {
            params,
            roster: Roster::new(agents),
            queue: CombatQueue::new(),
            stopping: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            kills: AtomicUsize::new(0),
        })
    }

    /// Run parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The shared roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The combat task queue.
    pub fn queue(&self) -> &CombatQueue {
        &self.queue
    }

    /// Current scheduler state.
    pub fn phase(&self) -> Phase {
        if self.stopping.load(Ordering::Acquire) || self.queue.is_draining() {
            Phase::Draining
        } else {
            Phase::Ticking
        }
    }

    /// Movement ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Kills recorded so far.
    pub fn kills(&self) -> usize {
        self.kills.load(Ordering::Relaxed)
    }

    /// Moves every living agent once.
    pub fn move_pass<R: Rng>(&self, rng: &mut R) {
        self.roster
            .move_all(self.params.map_width, self.params.map_height, rng);
    }

    /// Queues a combat task for every pair currently in range.
    ///
    /// Returns the number of tasks queued.
    pub fn scan(&self) -> Result<usize, SimError> {
        let agents = self.roster.snapshot();
        let index = SpatialIndex::build(&agents)?;
        let pairs = index.pairs_in_range(self.params.range_policy)?;

        for &(i, j) in &pairs {
            self.queue.push(CombatTask {
                attacker: Arc::clone(&agents[i]),
                target: Arc::clone(&agents[j]),
            });
        }
        Ok(pairs.len())
    }

    /// One movement tick: a move pass followed by a scan.
    pub fn tick<R: Rng>(&self, rng: &mut R) -> Result<usize, SimError> {
        self.move_pass(rng);
        let queued = self.scan()?;
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(tick, queued, "movement tick");
        Ok(queued)
    }

    /// Resolves one dequeued task.
    ///
    /// A task whose agents died or drifted apart since it was queued is
    /// dropped without effect.
    pub fn process(&self, task: &CombatTask) -> FightOutcome {
        if !task
            .attacker
            .is_within_reach(&task.target, self.params.range_policy)
        {
            trace!(
                attacker = task.attacker.name(),
                target = task.target.name(),
                "stale combat task"
            );
            return FightOutcome::Declined;
        }

        let outcome = combat::resolve(&task.attacker, &task.target, self.params.combat_policy);
        if let Some(event) = outcome.kill() {
            self.kills.fetch_add(1, Ordering::Relaxed);
            announce(event);
        }
        outcome
    }

    /// Processes queued tasks until the queue is empty, without waiting.
    ///
    /// Returns the number of kills.
    pub fn process_pending(&self) -> usize {
        let mut kills = 0;
        while let Some(task) = self.queue.try_pop() {
            if self.process(&task).is_kill() {
                kills += 1;
            }
        }
        kills
    }

    /// Spawns the movement driver and the combat worker.
    pub fn start(self) -> Result<RunningSimulation, SimError> {
        let sim = Arc::new(self);

        let movement = {
            let sim = Arc::clone(&sim);
            thread::Builder::new()
                .name("movement".into())
                .spawn(move || run_movement(&sim))
                .map_err(SimError::Spawn)?
        };

        let combat = {
            let worker = Arc::clone(&sim);
            thread::Builder::new()
                .name("combat".into())
                .spawn(move || run_combat(&worker))
        };
        let combat = match combat {
            Ok(handle) => handle,
            Err(e) => {
                sim.stopping.store(true, Ordering::Release);
                join("movement", movement);
                return Err(SimError::Spawn(e));
            }
        };

        info!(agents = sim.roster.len(), "simulation started");
        Ok(RunningSimulation {
            sim,
            movement: Some(movement),
            combat: Some(combat),
        })
    }

    /// Totals and survivors as of now.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks(),
            kills: self.kills(),
            survivors: self.roster.survivors(),
            unprocessed: self.queue.len(),
        }
    }
}

/// Handle to a simulation whose workers are running.
pub struct RunningSimulation {
    sim: Arc<Simulation>,
    movement: Option<JoinHandle<()>>,
    combat: Option<JoinHandle<()>>,
}

impl RunningSimulation {
    /// The running simulation, for reading state while it runs.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Requests draining, waits for both workers, and reports the totals.
    pub fn stop(mut self) -> RunSummary {
        self.shutdown();
        let summary = self.sim.summary();
        info!(
            ticks = summary.ticks,
            kills = summary.kills,
            survivors = summary.survivors.len(),
            "simulation stopped"
        );
        summary
    }

    fn shutdown(&mut self) {
        self.sim.stopping.store(true, Ordering::Release);
        if let Some(handle) = self.movement.take() {
            join("movement", handle);
        }
        self.sim.queue.begin_drain();
        if let Some(handle) = self.combat.take() {
            join("combat", handle);
        }
    }
}

impl Drop for RunningSimulation {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_movement(sim: &Simulation) {
    let mut rng = rand::rng();
    let period = sim.params.tick_period();
    loop {
        thread::sleep(period);
        if sim.stopping.load(Ordering::Acquire) {
            break;
        }
        if let Err(e) = sim.tick(&mut rng) {
            error!(error = %e, "proximity scan failed");
        }
    }
    debug!("movement driver stopped");
}

fn run_combat(sim: &Simulation) {
    while let Some(task) = sim.queue.pop_blocking() {
        sim.process(&task);
    }
    debug!("combat worker stopped");
}

fn join(name: &str, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        error!(worker = name, "worker thread panicked");
    }
}

fn announce(event: &KillEvent) {
    info!(killer = %event.killer, victim = %event.victim, mutual = event.mutual, "kill");
    let mut out = std::io::stdout().lock();
    if let Err(e) = writeln!(out, "[BATTLE] {} killed {}", event.killer, event.victim) {
        warn!(error = %e, "battle announcement write failed");
    }
}
