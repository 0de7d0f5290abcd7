//! Creep system: movement, buff decay, poison and region transitions.

use hecs::Entity;

use frobnicator_core::components::{CreepState, Position, Stats};
use frobnicator_core::constants::{CREEP_CENTER_OFFSET, CREEP_SIZE, DETOUR_INTERVAL, GOAL_REGION};
use frobnicator_core::enums::KillCause;
use frobnicator_core::events::SimEvent;
use frobnicator_core::types::{Buff, BuildingId, CreepId, Vec2};
use frobnicator_map::Region;

use crate::world::GameWorld;

/// Advance every registered creep, in id order.
pub fn run(world: &mut GameWorld, dt: f32) {
    let creeps: Vec<(CreepId, Entity)> = world.creeps.iter().map(|(&id, &e)| (id, e)).collect();

    for (id, entity) in creeps {
        if world.creeps.get(&id) != Some(&entity) {
            continue;
        }

        if let Some((amount, by)) = advance(world, entity, dt) {
            world.damage(entity, amount, by.into());
            if world.creeps.get(&id) != Some(&entity) {
                continue;
            }
        }

        update_region(world, id, entity);
    }
}

/// Speed after the slow buff, which only applies while it lasts.
pub fn effective_speed(base: f32, slow: &Buff) -> f32 {
    if slow.is_active() {
        base * slow.amount
    } else {
        base
    }
}

/// Move a creep's top-left corner so its center approaches `destination`
/// by at most `step`, stopping exactly on it.
pub fn step_toward(pos: &mut Vec2, destination: Vec2, step: f32) {
    let goal = destination - Vec2::splat(CREEP_CENTER_OFFSET);
    let delta = goal - *pos;
    let distance = delta.length();
    if distance <= step {
        *pos = goal;
    } else {
        *pos += delta / distance * step;
    }
}

/// Move, then tick buffs. Returns poison damage owed for this tick.
fn advance(world: &mut GameWorld, entity: Entity, dt: f32) -> Option<(f32, BuildingId)> {
    let Ok((pos, state, stats)) = world
        .ecs
        .query_one_mut::<(&mut Position, &mut CreepState, &Stats)>(entity)
    else {
        return None;
    };

    let speed = effective_speed(stats.blueprint.stat(stats.level).speed, &state.slow);
    step_toward(&mut pos.0, state.destination, speed * dt);

    let poison = if state.poison.is_active() {
        state
            .poison_source
            .map(|by| (state.poison.amount * dt, by))
    } else {
        None
    };

    state.slow.tick(dt);
    state.poison.tick(dt);
    poison
}

/// Recompute region membership and fire exit/enter handling.
fn update_region(world: &mut GameWorld, id: CreepId, entity: Entity) {
    let Some(pos) = world.position(entity) else {
        return;
    };
    let found: Option<Region> = world
        .level
        .region_at(pos, Vec2::splat(CREEP_SIZE))
        .cloned();
    let Some(current) = world
        .ecs
        .get::<&CreepState>(entity)
        .ok()
        .map(|s| s.region.clone())
    else {
        return;
    };

    let found_name = found.as_ref().map(|r| r.name.clone());
    if found_name == current {
        return;
    }

    if let Some(old) = current {
        world.events.push(SimEvent::RegionExited {
            creep: id,
            region: old,
        });
    }
    if let Ok(mut state) = world.ecs.get::<&mut CreepState>(entity) {
        state.region = found_name;
    }
    if let Some(region) = found {
        world.events.push(SimEvent::RegionEntered {
            creep: id,
            region: region.name.clone(),
        });
        enter_region(world, entity, &region);
    }
}

/// Route a creep that just entered `region`. The goal region ends its run.
fn enter_region(world: &mut GameWorld, entity: Entity, region: &Region) {
    if region.name == GOAL_REGION {
        world.kill(entity, KillCause::Escaped);
        return;
    }

    let route = {
        let Ok(mut state) = world.ecs.get::<&mut CreepState>(entity) else {
            return;
        };
        state.detour_countdown = state.detour_countdown.saturating_sub(1);
        if state.detour_countdown == 0 {
            state.detour_countdown = DETOUR_INTERVAL;
            region.inner.clone()
        } else {
            region.next.clone()
        }
    };

    let destination = route
        .as_deref()
        .and_then(|name| world.level.find_waypoint(name))
        .map(Region::middle);
    match destination {
        Some(destination) => {
            if let Ok(mut state) = world.ecs.get::<&mut CreepState>(entity) {
                state.destination = destination;
            }
        }
        None => log::warn!(
            "Waypoint '{}' refers to non-existing waypoint '{}', ignored.",
            region.name,
            route.as_deref().unwrap_or_default()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_scales_speed_only_while_active() {
        let mut slow = Buff::new(0.5, 0.1);
        assert_eq!(effective_speed(60.0, &slow), 30.0);
        slow.tick(0.1);
        assert_eq!(effective_speed(60.0, &slow), 60.0);
    }

    #[test]
    fn test_step_toward_snaps_on_overshoot() {
        let mut pos = Vec2::new(0.0, 0.0);
        // Center at (24, 24); destination center (124, 24).
        step_toward(&mut pos, Vec2::new(124.0, 24.0), 30.0);
        assert_eq!(pos, Vec2::new(30.0, 0.0));
        step_toward(&mut pos, Vec2::new(124.0, 24.0), 500.0);
        assert_eq!(pos, Vec2::new(100.0, 0.0));
        step_toward(&mut pos, Vec2::new(124.0, 24.0), 5.0);
        assert_eq!(pos, Vec2::new(100.0, 0.0));
    }
}
