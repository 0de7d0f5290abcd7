//! Cleanup system: despawns entities nobody holds any more.

use crate::world::GameWorld;

/// Despawn every entity whose last reference was released this tick.
pub fn run(world: &mut GameWorld) {
    for entity in world.despawn_buffer.drain(..) {
        let _ = world.ecs.despawn(entity);
    }
}
