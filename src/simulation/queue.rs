//! Combat task queue shared by the movement driver and the combat worker.
//!
//! A mutex-guarded deque plus a condition variable. The drain flag lives under
//! the same mutex as the tasks, so a worker cannot miss the shutdown request
//! between checking the queue and going to sleep on it.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::agent::Agent;

/// A pending fight between two agents.
#[derive(Debug, Clone)]
pub struct CombatTask {
    /// Agent that starts the fight.
    pub attacker: Arc<Agent>,
    /// Agent being attacked.
    pub target: Arc<Agent>,
}

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<CombatTask>,
    draining: bool,
}

/// Unbounded FIFO of combat tasks.
///
/// Pushing never blocks. Nothing limits growth when the worker falls behind.
#[derive(Default)]
pub struct CombatQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl CombatQueue {
    /// Creates an empty queue in the accepting state.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a task and wakes the worker.
    pub fn push(&self, task: CombatTask) {
        self.lock().tasks.push_back(task);
        self.ready.notify_one();
    }

    /// Takes the next task without waiting.
    pub fn try_pop(&self) -> Option<CombatTask> {
        self.lock().tasks.pop_front()
    }

    /// Waits for the next task.
    ///
    /// Returns `None` once draining has been requested and the queue is empty;
    /// tasks queued before the drain are still handed out.
    pub fn pop_blocking(&self) -> Option<CombatTask> {
        let mut state = self
            .ready
            .wait_while(self.lock(), |s| s.tasks.is_empty() && !s.draining)
            .unwrap_or_else(PoisonError::into_inner);
        state.tasks.pop_front()
    }

    /// Switches to draining and wakes every waiter. Idempotent.
    pub fn begin_drain(&self) {
        self.lock().draining = true;
        self.ready.notify_all();
    }

    /// Whether draining has been requested.
    pub fn is_draining(&self) -> bool {
        self.lock().draining
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Whether no task is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
