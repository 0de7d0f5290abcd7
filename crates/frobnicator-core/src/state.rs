//! Frame snapshot: the complete read-only state handed to a renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{CreepId, EntityKey, Rect, SimTime, Vec2};

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub gold: i32,
    pub lives: u32,
    /// Index of the most recently spawned wave (0 before the first).
    pub wave: u32,
    /// Whole seconds until the next wave.
    pub next_wave_secs: u32,
    pub creep_count: usize,
    /// Creeps and buildings, sorted back-to-front by `position.y`.
    pub entities: Vec<EntityView>,
    pub projectiles: Vec<ProjectileView>,
    pub regions: Vec<RegionView>,
    pub messages: Vec<MessageView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<SimEvent>,
}

/// A creep or building as drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub key: EntityKey,
    pub name: String,
    pub position: Vec2,
    pub level: usize,
    pub hp: f32,
    pub max_hp: f32,
    pub sprite: Option<String>,
    /// Present for buildings only.
    pub building: Option<BuildingInfo>,
}

/// Info-panel details for a building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingInfo {
    pub damage: f32,
    pub range: f32,
    /// Shots per minute.
    pub rof: f32,
    pub slow: f32,
    pub slow_duration: f32,
    pub target: Option<CreepId>,
    /// `None` at the highest level.
    pub upgrade_cost: Option<i32>,
    pub sell_value: i32,
}

/// Head and tail of a projectile streak.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectileView {
    pub head: Vec2,
    pub tail: Vec2,
}

/// A waypoint or spawnpoint outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionView {
    pub name: String,
    pub kind: RegionKind,
    pub rect: Rect,
}

/// A floating economy message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub position: Vec2,
    pub text: String,
    pub kind: MessageKind,
    /// Opacity in 0..=1.
    pub alpha: f32,
}
