//! The shared agent roster.
//!
//! Agents are never removed during a run; dead ones stay in place and are only
//! filtered out for display and reporting.

use std::sync::{Arc, PoisonError, RwLock};

use rand::Rng;

use super::agent::{Agent, AgentSnapshot};
use super::kind::AgentKind;

/// Reader-writer guarded list of shared agents.
#[derive(Debug, Default)]
pub struct Roster {
    agents: RwLock<Vec<Arc<Agent>>>,
}

impl Roster {
    /// Creates a roster from agents in their display and scan order.
    pub fn new(agents: Vec<Arc<Agent>>) -> Self {
        Self {
            agents: RwLock::new(agents),
        }
    }

    /// Copies the agent handles under shared access.
    ///
    /// The lock is released on return, so long scans over the copy do not
    /// hold up the movement pass.
    pub fn snapshot(&self) -> Vec<Arc<Agent>> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Moves every living agent while holding exclusive access.
    pub fn move_all<R: Rng>(&self, width: i32, height: i32, rng: &mut R) {
        let agents = self.agents.write().unwrap_or_else(PoisonError::into_inner);
        for agent in agents.iter().filter(|a| a.is_alive()) {
            agent.move_within(width, height, rng);
        }
    }

    /// Number of agents, dead or alive.
    pub fn len(&self) -> usize {
        self.agents.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the roster holds no agents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshots of the living agents, in roster order.
    pub fn survivors(&self) -> Vec<AgentSnapshot> {
        self.snapshot()
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| a.snapshot())
            .collect()
    }
}

/// Creates `count` agents of uniformly random kind at uniformly random positions.
///
/// Agents are named after their kind and index, e.g. `Bear0`, `Duck1`.
pub fn populate<R: Rng>(
    count: usize,
    width: i32,
    height: i32,
    rng: &mut R,
) -> Vec<Arc<Agent>> {
    (0..count)
        .map(|i| {
            let kind = AgentKind::ALL[rng.random_range(0..AgentKind::ALL.len())];
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            Agent::shared(kind, format!("{kind}{i}"), x, y)
        })
        .collect()
}
