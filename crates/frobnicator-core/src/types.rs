//! Fundamental geometric, timing and identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use glam::{IVec2, Vec2};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }

    /// Whole deciseconds elapsed since the start of the simulation.
    /// Tower cooldowns are measured on this clock.
    pub fn deciseconds(&self) -> u64 {
        self.tick * 10 / crate::constants::TICK_RATE as u64
    }
}

/// Identifier of a creep, unique within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreepId(pub u32);

/// Identifier of a building, unique within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Polymorphic entity reference. Replaces sniffing the first character
/// of a string id to tell creeps and buildings apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum EntityKey {
    Creep(CreepId),
    Building(BuildingId),
}

impl fmt::Display for CreepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "creep_{:04}", self.0)
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "building_{}", self.0)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Creep(id) => id.fmt(f),
            EntityKey::Building(id) => id.fmt(f),
        }
    }
}

impl From<CreepId> for EntityKey {
    fn from(id: CreepId) -> Self {
        EntityKey::Creep(id)
    }
}

impl From<BuildingId> for EntityKey {
    fn from(id: BuildingId) -> Self {
        EntityKey::Building(id)
    }
}

/// Axis-aligned rectangle in world units (pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Center point of the rectangle.
    pub fn middle(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.w as f32 * 0.5,
            self.y as f32 + self.h as f32 * 0.5,
        )
    }

    /// Test a box anchored at `pos` (top-left) with the given size.
    ///
    /// With `fully_inside` the whole box must lie within the rectangle,
    /// otherwise any overlap counts.
    pub fn contains(&self, pos: Vec2, size: Vec2, fully_inside: bool) -> bool {
        let left = self.x as f32;
        let top = self.y as f32;
        let right = left + self.w as f32;
        let bottom = top + self.h as f32;

        if fully_inside {
            pos.x >= left && pos.y >= top && pos.x + size.x <= right && pos.y + size.y <= bottom
        } else {
            pos.x < right && pos.y < bottom && pos.x + size.x > left && pos.y + size.y > top
        }
    }
}

/// Timed modifier on a creep. A zero duration means inactive; the amount
/// is only meaningful while the duration is positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub amount: f32,
    /// Remaining seconds.
    pub duration: f32,
}

impl Buff {
    pub fn new(amount: f32, duration: f32) -> Self {
        Self { amount, duration }
    }

    /// Count the buff down by `dt`, flooring at zero.
    pub fn tick(&mut self, dt: f32) {
        if self.duration == 0.0 {
            return;
        }
        self.duration = (self.duration - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0.0
    }
}
