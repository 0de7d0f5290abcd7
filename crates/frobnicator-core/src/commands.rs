//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::BuildingId;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Build a tower of the named blueprint with its top-left tile at (x, y).
    PlaceTower { kind: String, x: u32, y: u32 },
    /// Buy the next level of a building.
    UpgradeTower { building: BuildingId },
    /// Sell a building for part of what was paid.
    SellTower { building: BuildingId },
}
