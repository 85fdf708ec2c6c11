//! Fight notification for thread-safe fan-out to registered sinks.
//!
//! Every agent owns a [`Subscribers`] list. When the agent wins or loses a
//! fight as the attacker, each subscriber is called in registration order
//! while the list is locked, so registration and delivery never interleave.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::agent::Agent;

/// A completed kill, produced by the combat resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillEvent {
    /// Name of the agent credited with the kill.
    ///
    /// For a mutual kill this is the initiating attacker, even though it died too.
    pub killer: String,
    /// Name of the agent that died.
    pub victim: String,
    /// Whether the killer died in the same fight.
    pub mutual: bool,
}

/// Receiver of fight reports.
///
/// Implementations must not fail: an error inside a sink is handled and
/// reported by the sink itself so the remaining subscribers still get the
/// report. A sink must not subscribe to the agent it is being notified by,
/// since the subscriber list is locked during delivery.
pub trait FightObserver: Send + Sync {
    /// Called after `attacker` fought `defender`; `won` is true when the defender died.
    fn on_fight(&self, attacker: &Agent, defender: &Agent, won: bool);
}

/// Ordered list of sinks registered on one agent.
#[derive(Default)]
pub struct Subscribers {
    observers: Mutex<Vec<Arc<dyn FightObserver>>>,
}

impl Subscribers {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sink. It will be called after all previously registered sinks.
    pub fn subscribe(&self, observer: Arc<dyn FightObserver>) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Number of registered sinks.
    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no sink is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers one fight report to every sink, in order.
    pub fn notify(&self, attacker: &Agent, defender: &Agent, won: bool) {
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner);
        for observer in observers.iter() {
            observer.on_fight(attacker, defender, won);
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}
