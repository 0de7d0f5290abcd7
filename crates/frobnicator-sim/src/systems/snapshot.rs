//! Snapshot system: builds the read-only FrameSnapshot handed to a renderer.
//!
//! This system never modifies the world.

use hecs::Entity;

use frobnicator_core::components::*;
use frobnicator_core::events::SimEvent;
use frobnicator_core::state::*;

use crate::systems::waves::WaveSchedule;
use crate::world::GameWorld;

/// Build a complete FrameSnapshot from the current world state.
pub fn build_snapshot(
    world: &GameWorld,
    schedule: &WaveSchedule,
    events: Vec<SimEvent>,
) -> FrameSnapshot {
    FrameSnapshot {
        time: world.time,
        phase: world.phase,
        gold: world.economy.gold,
        lives: world.economy.lives,
        wave: schedule.wave,
        next_wave_secs: schedule.secs_until_next(world.time.tick),
        creep_count: world.creeps.len(),
        entities: build_entities(world),
        projectiles: build_projectiles(world),
        regions: build_regions(world),
        messages: build_messages(world),
        events,
    }
}

/// Registered creeps and buildings, back-to-front.
fn build_entities(world: &GameWorld) -> Vec<EntityView> {
    let mut views: Vec<EntityView> = world
        .creeps
        .values()
        .chain(world.buildings.values())
        .filter_map(|&entity| entity_view(world, entity))
        .collect();

    views.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
    views
}

fn entity_view(world: &GameWorld, entity: Entity) -> Option<EntityView> {
    let mut query = world
        .ecs
        .query_one::<(&Identity, &Position, &Health, &Stats, Option<&TowerState>)>(entity)
        .ok()?;
    let (identity, pos, health, stats, tower) = query.get()?;

    let stat = stats.blueprint.stat(stats.level);
    let building = tower.map(|tower| BuildingInfo {
        damage: stat.damage,
        range: stat.range,
        rof: stat.rof,
        slow: stat.slow,
        slow_duration: stat.slow_duration,
        target: tower.target,
        upgrade_cost: (stats.level < stats.blueprint.max_level())
            .then(|| stats.blueprint.cost(stats.level + 1)),
        sell_value: stats.blueprint.sell_value(stats.level),
    });

    Some(EntityView {
        key: identity.0,
        name: stat.name.clone(),
        position: pos.0,
        level: stats.level,
        hp: health.hp,
        max_hp: stat.hp,
        sprite: stat.sprite.clone(),
        building,
    })
}

fn build_projectiles(world: &GameWorld) -> Vec<ProjectileView> {
    world
        .projectiles
        .iter()
        .map(|p| {
            let target_pos = world.position(p.target).unwrap_or(p.source);
            let (tail, head) = p.endpoints(target_pos);
            ProjectileView { head, tail }
        })
        .collect()
}

fn build_regions(world: &GameWorld) -> Vec<RegionView> {
    world
        .level
        .regions()
        .map(|r| RegionView {
            name: r.name.clone(),
            kind: r.kind,
            rect: r.rect,
        })
        .collect()
}

fn build_messages(world: &GameWorld) -> Vec<MessageView> {
    world
        .messages
        .iter()
        .map(|m| MessageView {
            position: m.position,
            text: m.text.clone(),
            kind: m.kind,
            alpha: m.alpha(),
        })
        .collect()
}
