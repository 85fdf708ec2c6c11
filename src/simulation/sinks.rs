//! Fight sinks that write reports to the console or a log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use tracing::warn;

use super::agent::Agent;
use super::events::FightObserver;
use crate::error::SimError;

fn describe(attacker: &Agent, defender: &Agent, won: bool) -> String {
    if won {
        format!("{} killed {}", attacker.name(), defender.name())
    } else {
        format!("{} attacked {} and lost", attacker.name(), defender.name())
    }
}

/// Prints one line per fight to standard output.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Creates a console sink.
    pub fn new() -> Self {
        Self
    }
}

impl FightObserver for ConsoleSink {
    fn on_fight(&self, attacker: &Agent, defender: &Agent, won: bool) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "[FIGHT] {}", describe(attacker, defender, won)) {
            warn!(error = %e, "console sink write failed");
        }
    }
}

/// Appends one timestamped line per fight to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SimError::SinkOpen {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

impl FightObserver for FileSink {
    fn on_fight(&self, attacker: &Agent, defender: &Agent, won: bool) {
        let line = format!(
            "{} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            describe(attacker, defender, won)
        );
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{line}") {
            warn!(path = %self.path.display(), error = %e, "log sink write failed");
        }
    }
}
