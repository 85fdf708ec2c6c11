//! # npc_arena - Concurrent NPC Arena Simulation
//!
//! A population of agents wanders a bounded grid and fights whenever one gets
//! within reach of another. Movement and combat run on separate threads over a
//! shared roster.
//!
//! ## Features
//!
//! - Three agent kinds (bear, duck, desman) with fixed movement and kill radii
//! - Deterministic kind-vs-kind combat table, with a dice-contest variant
//! - KD-tree proximity scan fanned out with rayon
//! - Per-agent fight notification to console, file, and in-memory sinks
//! - Movement driver and combat worker with a draining shutdown
//! - Plain-text roster files and a text map renderer
//!
//! ## Core Modules
//!
//! - [`simulation::agent`] - Agent state, movement, and range checks
//! - [`simulation::combat`] - Combat resolution
//! - [`simulation::events`] - Fight notification
//! - [`simulation::scheduler`] - Simulation context and worker threads

/// Error type shared across the crate.
pub mod error;
/// Text map and survivor rendering.
pub mod display;
/// Roster file loading and saving.
pub mod persistence;

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agent state, movement, and proximity checks.
    pub mod agent;
    /// Combat resolution by kind pair.
    pub mod combat;
    /// In-memory log of recent fights.
    pub mod event_log;
    /// Kill events and per-agent fight notification.
    pub mod events;
    /// Grid positions, distances, and map bounds.
    pub mod geometric_utils;
    /// Agent kinds and their fixed traits.
    pub mod kind;
    /// Simulation parameters.
    pub mod params;
    /// Combat task queue.
    pub mod queue;
    /// Shared agent roster and random population.
    pub mod roster;
    /// Simulation context, movement driver, and combat worker.
    pub mod scheduler;
    /// Console and file fight sinks.
    pub mod sinks;
    /// KD-tree proximity scan.
    pub mod spatial;
}

pub use error::SimError;
