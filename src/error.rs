//! Error types shared by the simulation, persistence, and sinks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring, loading, or running a simulation.
///
/// Configuration and resource errors are fatal to the operation that hit them.
/// Stale combat tasks are not errors and never show up here.
#[derive(Debug, Error)]
pub enum SimError {
    /// A file could not be read or written.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A roster line names a kind that does not exist.
    #[error("line {line}: unknown agent type `{token}`")]
    UnknownKind {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A roster line does not have the `<Type> <Name> <X> <Y>` shape.
    #[error("line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// Configuration JSON could not be parsed or produced.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// Configuration parsed but holds unusable values.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// An agent was placed outside the map.
    #[error("agent {name} at ({x}, {y}) lies outside the map")]
    OutOfBounds {
        /// Agent name.
        name: String,
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
    },
    /// A log sink could not be opened.
    #[error("cannot open log sink {path}: {source}")]
    SinkOpen {
        /// Log file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The proximity index rejected a point.
    #[error("spatial index error: {0}")]
    SpatialIndex(String),
    /// A worker thread could not be started.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
}

impl SimError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
