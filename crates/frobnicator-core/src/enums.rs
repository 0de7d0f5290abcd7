//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::EntityKey;

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation systems run every tick.
    #[default]
    Running,
    /// Lives exhausted. Input is still polled and snapshots still built,
    /// but nothing moves.
    GameOver,
}

/// Why an entity left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KillCause {
    /// Hit points reached zero; `by` is the entity credited with the kill.
    Slain { by: EntityKey },
    /// Reached the goal region (or was otherwise removed without a killer).
    Escaped,
}

/// Which side of the ledger a transaction landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Gold spent (shown red).
    Cost,
    /// Gold earned (shown yellow).
    Income,
}

/// Role of a region in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Waypoint,
    Spawnpoint,
}
