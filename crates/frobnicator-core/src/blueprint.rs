//! Blueprints: immutable, level-indexed stat tables.
//!
//! A blueprint is the flyweight shared by every entity of one type. Level 0
//! is the base row; entities index it directly with their current level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DECISECONDS_PER_MINUTE, SELL_REFUND_RATIO};
use crate::error::ContentError;
use crate::types::Buff;

/// Gameplay stats for one level of a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub name: String,
    /// Build cost for level 1, upgrade cost for later levels, bounty for creeps.
    pub cost: i32,
    /// Radius around the impact point that also takes damage.
    pub splash: f32,
    pub damage: f32,
    /// Rate of fire in shots per minute.
    pub rof: f32,
    pub range: f32,
    /// Speed multiplier applied to the target (e.g. 0.5 halves speed).
    pub slow: f32,
    pub slow_duration: f32,
    /// Hit points per second lost by a poisoned target.
    pub poison: f32,
    pub poison_duration: f32,
    /// Movement speed (units per second).
    pub speed: f32,
    pub armor: f32,
    /// Maximum hit points.
    pub hp: f32,
    /// Number of units spawned per spawnpoint (wave tables only).
    pub amount: u32,
    /// Opaque sprite handle for the rendering backend.
    pub sprite: Option<String>,
}

impl Default for LevelStats {
    fn default() -> Self {
        Self {
            name: "unnamed tower".to_string(),
            cost: 100,
            splash: 0.0,
            damage: 1.0,
            rof: 1.0,
            range: 100.0,
            slow: 0.0,
            slow_duration: 0.0,
            poison: 0.0,
            poison_duration: 0.0,
            speed: 0.0,
            armor: 0.0,
            hp: 10.0,
            amount: 10,
            sprite: None,
        }
    }
}

/// One level entry as written in a definition file. Every key is optional;
/// missing keys inherit the previous level's value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelOverrides {
    /// Informational only.
    pub level: Option<u32>,
    pub name: Option<String>,
    pub cost: Option<i32>,
    pub splash: Option<f32>,
    pub damage: Option<f32>,
    pub rof: Option<f32>,
    pub range: Option<f32>,
    pub slow: Option<f32>,
    pub slow_duration: Option<f32>,
    pub poison: Option<f32>,
    pub poison_duration: Option<f32>,
    pub speed: Option<f32>,
    pub armor: Option<f32>,
    pub hp: Option<f32>,
    pub amount: Option<u32>,
    pub sprite: Option<String>,
    /// Keys the loader does not understand; reported, never fatal.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

impl LevelOverrides {
    /// Produce the stats for this level on top of `previous`.
    pub fn apply(&self, previous: &LevelStats) -> LevelStats {
        let mut stats = previous.clone();
        if let Some(name) = &self.name {
            stats.name = name.clone();
        }
        if let Some(sprite) = &self.sprite {
            stats.sprite = Some(sprite.clone());
        }
        stats.cost = self.cost.unwrap_or(stats.cost);
        stats.splash = self.splash.unwrap_or(stats.splash);
        stats.damage = self.damage.unwrap_or(stats.damage);
        stats.rof = self.rof.unwrap_or(stats.rof);
        stats.range = self.range.unwrap_or(stats.range);
        stats.slow = self.slow.unwrap_or(stats.slow);
        stats.slow_duration = self.slow_duration.unwrap_or(stats.slow_duration);
        stats.poison = self.poison.unwrap_or(stats.poison);
        stats.poison_duration = self.poison_duration.unwrap_or(stats.poison_duration);
        stats.speed = self.speed.unwrap_or(stats.speed);
        stats.armor = self.armor.unwrap_or(stats.armor);
        stats.hp = self.hp.unwrap_or(stats.hp);
        stats.amount = self.amount.unwrap_or(stats.amount);
        stats
    }
}

/// Immutable stat table shared (via `Arc`) by all entities of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    label: String,
    levels: Vec<LevelStats>,
}

impl Blueprint {
    /// Build a blueprint from fully resolved levels. At least one level
    /// (the base row) is required.
    pub fn new(label: impl Into<String>, levels: Vec<LevelStats>) -> Result<Self, ContentError> {
        let label = label.into();
        if levels.is_empty() {
            return Err(ContentError::EmptyBlueprint { label });
        }
        Ok(Self { label, levels })
    }

    /// Fold partial level entries into a blueprint, each inheriting from the
    /// one before it (the first from [`LevelStats::default`]).
    pub fn from_overrides(
        label: impl Into<String>,
        entries: &[LevelOverrides],
    ) -> Result<Self, ContentError> {
        let mut current = LevelStats::default();
        let mut levels = Vec::with_capacity(entries.len());
        for entry in entries {
            current = entry.apply(&current);
            levels.push(current.clone());
        }
        Self::new(label, levels)
    }

    /// Where this blueprint came from (usually its file name).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Highest valid level index.
    pub fn max_level(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn get(&self, level: usize) -> Option<&LevelStats> {
        self.levels.get(level)
    }

    /// Stats for `level`. Out-of-range levels read the last row.
    pub fn stat(&self, level: usize) -> &LevelStats {
        debug_assert!(level < self.levels.len(), "level {level} out of range");
        &self.levels[level.min(self.max_level())]
    }

    pub fn name(&self, level: usize) -> &str {
        &self.stat(level).name
    }

    pub fn cost(&self, level: usize) -> i32 {
        self.stat(level).cost
    }

    pub fn amount(&self, level: usize) -> u32 {
        self.stat(level).amount
    }

    pub fn levels(&self) -> &[LevelStats] {
        &self.levels
    }

    /// Cooldown between shots at `level`, in deciseconds.
    /// A non-positive rate of fire never fires.
    pub fn firing_interval(&self, level: usize) -> u64 {
        let rof = self.stat(level).rof;
        if rof <= 0.0 {
            return u64::MAX;
        }
        (DECISECONDS_PER_MINUTE / rof) as u64
    }

    /// Refund for selling an entity at `level`: 75% of everything paid for
    /// levels 1..=level, rounded down. The base row is free.
    pub fn sell_value(&self, level: usize) -> i32 {
        let paid: i32 = (1..=level.min(self.max_level()))
            .map(|n| self.cost(n))
            .sum();
        (paid as f32 * SELL_REFUND_RATIO).floor() as i32
    }

    /// Slow granted by a shot at `level`, if any.
    pub fn slow_buff(&self, level: usize) -> Option<Buff> {
        let stats = self.stat(level);
        (stats.slow > 0.0 && stats.slow_duration > 0.0)
            .then(|| Buff::new(stats.slow, stats.slow_duration))
    }

    /// Poison granted by a shot at `level`, if any.
    pub fn poison_buff(&self, level: usize) -> Option<Buff> {
        let stats = self.stat(level);
        (stats.poison > 0.0 && stats.poison_duration > 0.0)
            .then(|| Buff::new(stats.poison, stats.poison_duration))
    }
}
