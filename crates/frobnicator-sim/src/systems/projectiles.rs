//! Projectile system: advances shots and applies their impact on arrival.

use hecs::Entity;

use frobnicator_core::components::CreepState;
use frobnicator_core::types::EntityKey;

use crate::projectile::{Projectile, ProjectileStatus};
use crate::world::GameWorld;

/// Advance all projectiles. Arrived ones apply their impact, release their
/// pins and are dropped.
pub fn run(world: &mut GameWorld, dt: f32) {
    let projectiles = std::mem::take(&mut world.projectiles);
    let mut in_flight = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        match projectile.tick(dt) {
            ProjectileStatus::InFlight => in_flight.push(projectile),
            ProjectileStatus::Arrived => {
                apply_impact(world, &projectile);
                world.dec_ref(projectile.target);
                world.dec_ref(projectile.building);
            }
        }
    }

    in_flight.append(&mut world.projectiles);
    world.projectiles = in_flight;
}

/// Damage the target, hand it the shot's buffs, then splash its neighbours.
pub fn apply_impact(world: &mut GameWorld, projectile: &Projectile) {
    let impact = projectile.impact;
    let by = EntityKey::Building(impact.attacker);
    let center = world.position(projectile.target);

    world.damage(projectile.target, impact.damage, by);

    if let Ok(mut state) = world.ecs.get::<&mut CreepState>(projectile.target) {
        if let Some(slow) = impact.slow {
            state.slow = slow;
        }
        if let Some(poison) = impact.poison {
            state.poison = poison;
            state.poison_source = Some(impact.attacker);
        }
    }

    let Some(center) = center.filter(|_| impact.splash > 0.0) else {
        return;
    };
    let splashed: Vec<Entity> = world
        .creeps
        .values()
        .copied()
        .filter(|&e| e != projectile.target)
        .filter(|&e| {
            world
                .position(e)
                .is_some_and(|p| p.distance(center) <= impact.splash)
        })
        .collect();
    for entity in splashed {
        world.damage(entity, impact.damage, by);
    }
}
