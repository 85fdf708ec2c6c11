//! Roster files: one agent per line, `<Type> <Name> <X> <Y>`.
//!
//! Loading is all or nothing. The first bad line aborts the load and no
//! agents are returned.

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use crate::error::SimError;
use crate::simulation::agent::{Agent, AgentSnapshot};
use crate::simulation::kind::{AgentKind, UnknownKind};

/// Parses roster text. Blank lines are skipped.
pub fn parse_roster(text: &str) -> Result<Vec<Arc<Agent>>, SimError> {
    let mut agents = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let [kind, name, x, y] = fields[..] else {
            return Err(SimError::MalformedLine {
                line,
                reason: format!(
                    "expected `<Type> <Name> <X> <Y>`, found {} fields",
                    fields.len()
                ),
            });
        };

        let kind: AgentKind = kind
            .parse()
            .map_err(|UnknownKind(token)| SimError::UnknownKind { line, token })?;
        let x = parse_coord(x, line)?;
        let y = parse_coord(y, line)?;
        agents.push(Agent::shared(kind, name, x, y));
    }
    Ok(agents)
}

fn parse_coord(token: &str, line: usize) -> Result<i32, SimError> {
    token.parse().map_err(|_| SimError::MalformedLine {
        line,
        reason: format!("coordinate `{token}` is not an integer"),
    })
}

/// Formats agents as roster text, one line each.
pub fn format_roster(agents: &[AgentSnapshot]) -> String {
    let mut out = String::new();
    for a in agents {
        let _ = writeln!(out, "{} {} {} {}", a.kind, a.name, a.position.x, a.position.y);
    }
    out
}

/// Reads and parses a roster file.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Arc<Agent>>, SimError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
    parse_roster(&text)
}

/// Writes a roster file in one call, replacing any previous content.
pub fn save_roster(path: impl AsRef<Path>, agents: &[AgentSnapshot]) -> Result<(), SimError> {
    let path = path.as_ref();
    std::fs::write(path, format_roster(agents)).map_err(|e| SimError::io(path, e))
}
