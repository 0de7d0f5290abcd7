//! Tower system: target validation, firing and acquisition.

use hecs::Entity;

use frobnicator_core::components::{Position, Stats, TowerState};
use frobnicator_core::constants::MUZZLE_OFFSET;
use frobnicator_core::events::SimEvent;
use frobnicator_core::types::{BuildingId, CreepId, Vec2};

use crate::projectile::{Impact, Projectile};
use crate::world::GameWorld;

/// Whether the cooldown has run out at decisecond `now`.
pub fn can_fire(tower: &TowerState, now: u64) -> bool {
    tower
        .last_fired
        .map_or(true, |last| now.saturating_sub(last) >= tower.firing_interval)
}

/// Advance every registered building, in id order.
pub fn run(world: &mut GameWorld) {
    let now = world.time.deciseconds();
    let buildings: Vec<(BuildingId, Entity)> =
        world.buildings.iter().map(|(&id, &e)| (id, e)).collect();

    for (id, entity) in buildings {
        if world.buildings.get(&id) != Some(&entity) {
            continue;
        }
        tick_building(world, id, entity, now);
    }
}

fn tick_building(world: &mut GameWorld, id: BuildingId, entity: Entity, now: u64) {
    let Ok((pos, tower, stats)) = world
        .ecs
        .query_one_mut::<(&Position, &TowerState, &Stats)>(entity)
    else {
        return;
    };
    let pos = pos.0;
    let range = stats.blueprint.stat(stats.level).range;
    let buffs = stats.blueprint.slow_buff(stats.level).is_some()
        || stats.blueprint.poison_buff(stats.level).is_some();
    let held = tower.target;
    let ready = can_fire(tower, now);

    let valid = held.filter(|&target| in_range(world, pos, target, range));
    let target = match valid {
        Some(target) if ready => {
            fire_at(world, id, entity, target, now);
            // Buffing towers let go after every shot so the next one picks
            // a fresh creep.
            (!buffs).then_some(target)
        }
        Some(target) => Some(target),
        None => acquire(world, pos, range),
    };

    if let Ok(mut tower) = world.ecs.get::<&mut TowerState>(entity) {
        tower.target = target;
    }
}

fn in_range(world: &GameWorld, pos: Vec2, target: CreepId, range: f32) -> bool {
    world
        .creeps
        .get(&target)
        .and_then(|&e| world.position(e))
        .is_some_and(|p| pos.distance(p) <= range)
}

/// Nearest registered creep strictly inside `range`; the lowest id wins ties.
fn acquire(world: &GameWorld, pos: Vec2, range: f32) -> Option<CreepId> {
    let mut best: Option<(CreepId, f32)> = None;
    for (&id, &entity) in &world.creeps {
        let Some(p) = world.position(entity) else {
            continue;
        };
        let distance = pos.distance(p);
        if distance < range && best.map_or(true, |(_, d)| distance < d) {
            best = Some((id, distance));
        }
    }
    best.map(|(id, _)| id)
}

/// Launch a projectile at `target`, pinning it and the building until it lands.
fn fire_at(world: &mut GameWorld, id: BuildingId, entity: Entity, target: CreepId, now: u64) {
    let Some(&target_entity) = world.creeps.get(&target) else {
        return;
    };
    let Some(target_pos) = world.position(target_entity) else {
        return;
    };
    let Some((pos, impact)) = world
        .ecs
        .query_one_mut::<(&Position, &Stats)>(entity)
        .ok()
        .map(|(pos, stats)| {
            let stat = stats.blueprint.stat(stats.level);
            let impact = Impact {
                damage: stat.damage,
                splash: stat.splash,
                slow: stats.blueprint.slow_buff(stats.level),
                poison: stats.blueprint.poison_buff(stats.level),
                attacker: id,
            };
            (pos.0, impact)
        })
    else {
        return;
    };

    world.inc_ref(entity);
    world.inc_ref(target_entity);
    let source = pos + Vec2::from(MUZZLE_OFFSET);
    world.projectiles.push(Projectile::new(
        source,
        target_entity,
        target,
        target_pos,
        entity,
        impact,
    ));

    if let Ok(mut tower) = world.ecs.get::<&mut TowerState>(entity) {
        tower.last_fired = Some(now);
    }
    world.events.push(SimEvent::ProjectileFired {
        building: id,
        target,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_fire_after_interval() {
        let mut tower = TowerState {
            id: BuildingId(1),
            target: None,
            last_fired: None,
            firing_interval: 10,
        };
        assert!(can_fire(&tower, 0));

        tower.last_fired = Some(20);
        assert!(!can_fire(&tower, 20));
        assert!(!can_fire(&tower, 29));
        assert!(can_fire(&tower, 30));
    }
}
