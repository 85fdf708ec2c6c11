//! In-memory log of recent fights, for end-of-run reporting.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::events::FightObserver;

/// A logged fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedFight {
    /// When the fight was reported
    pub at: DateTime<Utc>,
    /// Attacking agent
    pub attacker: String,
    /// Defending agent
    pub defender: String,
    /// Whether the defender died
    pub won: bool,
}

/// Event log that tracks recent fights
#[derive(Debug)]
pub struct EventLog {
    /// Recent fights, newest first
    events: Mutex<VecDeque<LoggedFight>>,
    /// Maximum number of fights to keep
    max_events: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(20)
    }
}

impl EventLog {
    /// Creates a new event log holding at most `max_events` fights
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events)),
            max_events,
        }
    }

    /// Adds a new fight to the log
    pub fn log(&self, attacker: &str, defender: &str, won: bool) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.push_front(LoggedFight {
            at: Utc::now(),
            attacker: attacker.to_string(),
            defender: defender.to_string(),
            won,
        });

        // Keep only the most recent fights
        while events.len() > self.max_events {
            events.pop_back();
        }
    }

    /// Returns a copy of all logged fights, newest first
    pub fn events(&self) -> Vec<LoggedFight> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Number of logged fights
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all fights
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl FightObserver for EventLog {
    fn on_fight(&self, attacker: &Agent, defender: &Agent, won: bool) {
        self.log(attacker.name(), defender.name(), won);
    }
}
