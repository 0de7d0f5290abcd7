//! Events emitted by the simulation for presentation and feedback.

use serde::{Deserialize, Serialize};

use crate::enums::KillCause;
use crate::types::{BuildingId, CreepId, EntityKey};

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A wave was released at the spawnpoints.
    WaveSpawned { wave: u32, count: usize },
    /// A building was constructed.
    TowerPlaced {
        building: BuildingId,
        kind: String,
        x: u32,
        y: u32,
    },
    /// A building reached a new level.
    TowerUpgraded { building: BuildingId, level: usize },
    /// A building was sold back.
    TowerSold { building: BuildingId, refund: i32 },
    /// A building launched a projectile.
    ProjectileFired {
        building: BuildingId,
        target: CreepId,
    },
    /// An entity left its registry.
    EntityKilled { entity: EntityKey, cause: KillCause },
    /// A creep reached the goal and a life was lost.
    LifeLost { lives: u32 },
    /// A creep left the region it occupied.
    RegionExited { creep: CreepId, region: String },
    /// A creep entered a region.
    RegionEntered { creep: CreepId, region: String },
    /// Gold changed by `amount` (positive = spent), leaving `gold`.
    GoldChanged { amount: i32, gold: i32 },
    /// Lives reached zero.
    GameOver,
}
