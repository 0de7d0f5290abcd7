//! Player actions: placing, upgrading and selling towers.
//!
//! Every action checks its preconditions before touching anything, so a
//! refused action leaves the world unchanged.

use std::sync::Arc;

use hecs::Entity;

use frobnicator_core::blueprint::Blueprint;
use frobnicator_core::components::{Health, Position, Stats, TowerState};
use frobnicator_core::enums::GamePhase;
use frobnicator_core::error::ActionError;
use frobnicator_core::events::SimEvent;
use frobnicator_core::types::{BuildingId, Vec2};

use crate::world::GameWorld;

/// Level a freshly placed tower starts at. Level 0 is the free base row.
pub const BUILD_LEVEL: usize = 1;

fn ensure_running(world: &GameWorld) -> Result<(), ActionError> {
    match world.phase {
        GamePhase::Running => Ok(()),
        GamePhase::GameOver => Err(ActionError::GameOver),
    }
}

/// Registered building with its blueprint, level and position.
fn building(
    world: &GameWorld,
    id: BuildingId,
) -> Result<(Entity, Arc<Blueprint>, usize, Vec2), ActionError> {
    let entity = world
        .buildings
        .get(&id)
        .copied()
        .ok_or(ActionError::UnknownBuilding(id))?;
    let mut query = world
        .ecs
        .query_one::<(&Stats, &Position)>(entity)
        .map_err(|_| ActionError::UnknownBuilding(id))?;
    let (stats, pos) = query.get().ok_or(ActionError::UnknownBuilding(id))?;
    Ok((entity, stats.blueprint.clone(), stats.level, pos.0))
}

/// Build a tower of blueprint `kind` with its top-left tile at (x, y).
pub fn place_tower(
    world: &mut GameWorld,
    kind: &str,
    x: u32,
    y: u32,
) -> Result<BuildingId, ActionError> {
    ensure_running(world)?;
    let blueprint = world
        .level
        .tower(kind)
        .cloned()
        .ok_or_else(|| ActionError::UnknownTower(kind.to_string()))?;
    if !world.level.tilemap.can_place(x, y) {
        return Err(ActionError::Blocked { x, y });
    }

    let level = BUILD_LEVEL.min(blueprint.max_level());
    let cost = blueprint.cost(level);
    let at = world.level.tilemap.tile_to_world(x, y);
    if !world.transaction(cost, at) {
        let gold = world.economy.gold;
        log::info!("Not enough gold, cost {cost} have {gold}");
        return Err(ActionError::InsufficientGold { cost, gold });
    }

    let id = world.spawn_building(blueprint, level, at);
    world.level.tilemap.reserve(x, y);
    world.events.push(SimEvent::TowerPlaced {
        building: id,
        kind: kind.to_string(),
        x,
        y,
    });
    Ok(id)
}

/// Whether the building has a level above its current one.
pub fn can_upgrade(world: &GameWorld, id: BuildingId) -> bool {
    building(world, id).is_ok_and(|(_, bp, level, _)| level < bp.max_level())
}

/// Price of the next level, if there is one.
pub fn upgrade_cost(world: &GameWorld, id: BuildingId) -> Option<i32> {
    let (_, blueprint, level, _) = building(world, id).ok()?;
    (level < blueprint.max_level()).then(|| blueprint.cost(level + 1))
}

/// Gold returned by selling the building now.
pub fn sell_value(world: &GameWorld, id: BuildingId) -> Option<i32> {
    let (_, blueprint, level, _) = building(world, id).ok()?;
    Some(blueprint.sell_value(level))
}

/// Buy the next level. Returns the new level.
pub fn upgrade_tower(world: &mut GameWorld, id: BuildingId) -> Result<usize, ActionError> {
    ensure_running(world)?;
    let (entity, blueprint, level, pos) = building(world, id)?;
    if level >= blueprint.max_level() {
        return Err(ActionError::MaxLevel(id));
    }

    let next = level + 1;
    let cost = blueprint.cost(next);
    if !world.transaction(cost, pos) {
        let gold = world.economy.gold;
        log::info!("Not enough gold, cost {cost} have {gold}");
        return Err(ActionError::InsufficientGold { cost, gold });
    }

    if let Ok((stats, health, tower)) = world
        .ecs
        .query_one_mut::<(&mut Stats, &mut Health, &mut TowerState)>(entity)
    {
        stats.level = next;
        health.hp = health.hp.min(blueprint.stat(next).hp);
        tower.firing_interval = blueprint.firing_interval(next);
    }
    log::info!("Upgraded {id} to \"{}\"", blueprint.name(next));
    world.events.push(SimEvent::TowerUpgraded {
        building: id,
        level: next,
    });
    Ok(next)
}

/// Sell the building for three quarters of what was paid. Its tiles become
/// buildable again. Shots already in flight still land.
pub fn sell_tower(world: &mut GameWorld, id: BuildingId) -> Result<i32, ActionError> {
    ensure_running(world)?;
    let (_, blueprint, level, pos) = building(world, id)?;
    let refund = blueprint.sell_value(level);

    world.transaction(-refund, pos);
    if let Some((x, y)) = world.level.tilemap.world_to_tile(pos) {
        world.level.tilemap.release(x, y);
    }
    log::info!("Sold {id} for {refund}");
    world.events.push(SimEvent::TowerSold {
        building: id,
        refund,
    });
    world.remove_entity(id.into());
    Ok(refund)
}
