//! Agent state, movement, and proximity checks.
//!
//! Agents are shared between the movement driver, the combat worker, and the
//! display thread through `Arc<Agent>`. Position, liveness, and the subscriber
//! list are each guarded on their own, so every method takes `&self`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{FightObserver, Subscribers};
use super::geometric_utils::{Position, clamp_to_map, euclidean_distance};
use super::kind::AgentKind;

/// Which radius decides whether two agents are close enough to fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// The attacker's own kill radius. A long-reach agent can start a fight
    /// with a short-reach one that could not reach back.
    #[default]
    AttackerRadius,
    /// The smaller of the two kill radii.
    MutualMinimum,
}

/// A simulated mobile entity.
#[derive(Debug)]
pub struct Agent {
    name: String,
    kind: AgentKind,
    move_radius: i32,
    kill_radius: i32,
    position: Mutex<Position>,
    alive: AtomicBool,
    subscribers: Subscribers,
}

/// Plain copy of an agent's state at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent name.
    pub name: String,
    /// Agent kind.
    pub kind: AgentKind,
    /// Position when the snapshot was taken.
    pub position: Position,
    /// Liveness when the snapshot was taken.
    pub alive: bool,
}

impl Agent {
    /// Creates a living agent. Radii are taken from `kind` and never change.
    pub fn new(kind: AgentKind, name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            move_radius: kind.move_radius(),
            kill_radius: kind.kill_radius(),
            position: Mutex::new(Position::new(x, y)),
            alive: AtomicBool::new(true),
            subscribers: Subscribers::new(),
        }
    }

    /// Creates an agent already wrapped for sharing.
    pub fn shared(kind: AgentKind, name: impl Into<String>, x: i32, y: i32) -> Arc<Self> {
        Arc::new(Self::new(kind, name, x, y))
    }

    /// Agent name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Agent kind.
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Maximum per-axis displacement per move.
    pub fn move_radius(&self) -> i32 {
        self.move_radius
    }

    /// Maximum distance at which this agent may start a fight.
    pub fn kill_radius(&self) -> i32 {
        self.kill_radius
    }

    /// Consistent copy of the current position.
    pub fn position(&self) -> Position {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the agent is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks the agent dead.
    ///
    /// Returns `true` only for the call that performed the alive to dead
    /// transition; every later call is a no-op returning `false`.
    pub fn kill(&self) -> bool {
        self.alive.swap(false, Ordering::AcqRel)
    }

    /// Moves by a uniform random offset on each axis, clamped to the map.
    ///
    /// Dead agents do not move.
    pub fn move_within<R: Rng>(&self, width: i32, height: i32, rng: &mut R) {
        if !self.is_alive() {
            return;
        }

        let dx = rng.random_range(-self.move_radius..=self.move_radius);
        let dy = rng.random_range(-self.move_radius..=self.move_radius);

        let mut pos = self.position.lock().unwrap_or_else(PoisonError::into_inner);
        *pos = clamp_to_map(
            Position::new(pos.x.saturating_add(dx), pos.y.saturating_add(dy)),
            width,
            height,
        );
    }

    /// Euclidean distance between the two current positions.
    pub fn distance_to(&self, other: &Agent) -> f64 {
        euclidean_distance(self.position(), other.position())
    }

    /// Whether both agents are alive and `other` is within this agent's kill radius.
    pub fn is_within_kill_range(&self, other: &Agent) -> bool {
        self.is_within_reach(other, RangePolicy::AttackerRadius)
    }

    /// Range check under an explicit [`RangePolicy`].
    pub fn is_within_reach(&self, other: &Agent, policy: RangePolicy) -> bool {
        if !self.is_alive() || !other.is_alive() {
            return false;
        }

        let radius = match policy {
            RangePolicy::AttackerRadius => self.kill_radius,
            RangePolicy::MutualMinimum => self.kill_radius.min(other.kill_radius),
        };
        self.distance_to(other) <= f64::from(radius)
    }

    /// Rolls a six-sided die.
    pub fn roll_dice(&self) -> i32 {
        rand::rng().random_range(1..=6)
    }

    /// Registers a sink for fights this agent starts.
    pub fn subscribe(&self, observer: Arc<dyn FightObserver>) {
        self.subscribers.subscribe(observer);
    }

    /// Sinks registered on this agent.
    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    /// Reports a fight this agent started to all of its sinks.
    pub fn notify_fight(&self, defender: &Agent, won: bool) {
        self.subscribers.notify(self, defender, won);
    }

    /// Copies out name, kind, position, and liveness.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            name: self.name.clone(),
            kind: self.kind,
            position: self.position(),
            alive: self.is_alive(),
        }
    }
}
