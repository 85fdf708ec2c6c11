//! The closed set of agent kinds and their fixed per-kind traits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind tag of an agent.
///
/// Each kind carries fixed movement and kill radii and a single-character
/// glyph used by the map renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Predator. Kills prey and rivals, and trades deaths with other bears.
    Bear,
    /// Prey. Never kills anything.
    Duck,
    /// Rival. Kills bears.
    Desman,
}

impl AgentKind {
    /// All kinds, in table order.
    pub const ALL: [AgentKind; 3] = [AgentKind::Bear, AgentKind::Duck, AgentKind::Desman];

    /// Maximum random displacement per axis for one movement step.
    pub fn move_radius(self) -> i32 {
        match self {
            AgentKind::Bear | AgentKind::Desman => 5,
            AgentKind::Duck => 50,
        }
    }

    /// Maximum Euclidean distance at which this kind may start a fight.
    pub fn kill_radius(self) -> i32 {
        match self {
            AgentKind::Bear | AgentKind::Duck => 10,
            AgentKind::Desman => 20,
        }
    }

    /// Map glyph.
    pub fn glyph(self) -> char {
        match self {
            AgentKind::Bear => 'B',
            AgentKind::Duck => 'D',
            AgentKind::Desman => 'S',
        }
    }

    /// Row/column index into the combat table.
    pub(crate) fn index(self) -> usize {
        match self {
            AgentKind::Bear => 0,
            AgentKind::Duck => 1,
            AgentKind::Desman => 2,
        }
    }

    /// Name used in roster files and generated agent names.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Bear => "Bear",
            AgentKind::Duck => "Duck",
            AgentKind::Desman => "Desman",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token does not name a known kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for AgentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bear" => Ok(AgentKind::Bear),
            "Duck" => Ok(AgentKind::Duck),
            "Desman" => Ok(AgentKind::Desman),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}
