//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blueprint::Blueprint;
use crate::types::{Buff, BuildingId, CreepId, EntityKey, Vec2};

/// Registry identity of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity(pub EntityKey);

/// World position (top-left corner of the entity's box).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Current hit points. Never above the level's `hp`; alive while positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hp: f32,
}

/// Shared stat table and the level currently indexed into it.
#[derive(Debug, Clone)]
pub struct Stats {
    pub blueprint: Arc<Blueprint>,
    pub level: usize,
}

/// Number of holders keeping the entity allocated. The registry holds one
/// reference from construction; projectiles in flight hold the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefCount(pub u32);

/// Routing and buff state of a creep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreepState {
    pub id: CreepId,
    /// Point the creep's center is heading for.
    pub destination: Vec2,
    /// Region the creep currently occupies, if any.
    pub region: Option<String>,
    /// Region entries left before the next detour to an inner waypoint.
    pub detour_countdown: u32,
    pub slow: Buff,
    pub poison: Buff,
    /// Building credited if the poison finishes the creep off.
    pub poison_source: Option<BuildingId>,
}

/// Targeting and cooldown state of a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerState {
    pub id: BuildingId,
    /// Creep currently targeted.
    pub target: Option<CreepId>,
    /// Simulated decisecond of the last shot.
    pub last_fired: Option<u64>,
    /// Cooldown in deciseconds, recomputed whenever the level changes.
    pub firing_interval: u64,
}
