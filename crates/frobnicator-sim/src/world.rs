//! GameWorld: registries, entity lifecycle and economy for one game.
//!
//! Entities live in a hecs `World`. The creep and building registries map
//! ids to entities; an entity is simulated and drawn only while registered.
//! Removal from a registry drops the registry's reference, and the entity
//! itself is despawned once nothing else (an in-flight projectile) holds it.

use std::collections::BTreeMap;
use std::sync::Arc;

use hecs::{Entity, World};

use frobnicator_core::blueprint::Blueprint;
use frobnicator_core::components::*;
use frobnicator_core::constants::DETOUR_INTERVAL;
use frobnicator_core::enums::{GamePhase, KillCause, MessageKind};
use frobnicator_core::events::SimEvent;
use frobnicator_core::types::{Buff, BuildingId, CreepId, EntityKey, SimTime, Vec2};
use frobnicator_map::Level;

use crate::economy::Economy;
use crate::projectile::Projectile;
use crate::systems::messages::FloatingMessage;

/// All mutable state of one game.
pub struct GameWorld {
    pub ecs: World,
    pub level: Level,
    pub creeps: BTreeMap<CreepId, Entity>,
    pub buildings: BTreeMap<BuildingId, Entity>,
    pub projectiles: Vec<Projectile>,
    pub economy: Economy,
    pub messages: Vec<FloatingMessage>,
    /// Events raised since the last snapshot.
    pub events: Vec<SimEvent>,
    /// Entities whose reference count reached zero this tick.
    pub despawn_buffer: Vec<Entity>,
    pub time: SimTime,
    pub phase: GamePhase,
    next_creep_id: u32,
    next_building_id: u32,
}

impl GameWorld {
    pub fn new(level: Level, economy: Economy) -> Self {
        Self {
            ecs: World::new(),
            level,
            creeps: BTreeMap::new(),
            buildings: BTreeMap::new(),
            projectiles: Vec::new(),
            economy,
            messages: Vec::new(),
            events: Vec::new(),
            despawn_buffer: Vec::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            next_creep_id: 1,
            next_building_id: 1,
        }
    }

    /// Create and register a creep heading for `destination`.
    pub fn spawn_creep(
        &mut self,
        blueprint: Arc<Blueprint>,
        level: usize,
        position: Vec2,
        destination: Vec2,
    ) -> CreepId {
        let id = CreepId(self.next_creep_id);
        self.next_creep_id += 1;

        let hp = blueprint.stat(level).hp;
        let entity = self.ecs.spawn((
            Identity(id.into()),
            Position(position),
            Health { hp },
            Stats { blueprint, level },
            RefCount(1),
            CreepState {
                id,
                destination,
                region: None,
                detour_countdown: DETOUR_INTERVAL,
                slow: Buff::default(),
                poison: Buff::default(),
                poison_source: None,
            },
        ));
        self.creeps.insert(id, entity);
        id
    }

    /// Create and register a building at `position`.
    pub fn spawn_building(
        &mut self,
        blueprint: Arc<Blueprint>,
        level: usize,
        position: Vec2,
    ) -> BuildingId {
        let id = BuildingId(self.next_building_id);
        self.next_building_id += 1;

        log::info!(
            "Creating \"{}\" at ({:.0},{:.0})",
            blueprint.name(level),
            position.x,
            position.y
        );

        let hp = blueprint.stat(level).hp;
        let firing_interval = blueprint.firing_interval(level);
        let entity = self.ecs.spawn((
            Identity(id.into()),
            Position(position),
            Health { hp },
            Stats { blueprint, level },
            RefCount(1),
            TowerState {
                id,
                target: None,
                last_fired: None,
                firing_interval,
            },
        ));
        self.buildings.insert(id, entity);
        id
    }

    /// Registered entity for `key`, if any.
    pub fn find_entity(&self, key: EntityKey) -> Option<Entity> {
        match key {
            EntityKey::Creep(id) => self.creeps.get(&id).copied(),
            EntityKey::Building(id) => self.buildings.get(&id).copied(),
        }
    }

    fn is_registered(&self, key: EntityKey, entity: Entity) -> bool {
        self.find_entity(key) == Some(entity)
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.ecs.get::<&Position>(entity).ok().map(|p| p.0)
    }

    pub fn hp(&self, entity: Entity) -> Option<f32> {
        self.ecs.get::<&Health>(entity).ok().map(|h| h.hp)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.hp(entity).is_some_and(|hp| hp > 0.0)
    }

    pub fn ref_count(&self, entity: Entity) -> Option<u32> {
        self.ecs.get::<&RefCount>(entity).ok().map(|r| r.0)
    }

    /// Add a holder to `entity`.
    pub fn inc_ref(&mut self, entity: Entity) {
        if let Ok(mut rc) = self.ecs.get::<&mut RefCount>(entity) {
            rc.0 += 1;
        }
    }

    /// Drop a holder from `entity`. The last release queues it for despawn
    /// at the end of the tick.
    pub fn dec_ref(&mut self, entity: Entity) {
        let Ok(mut rc) = self.ecs.get::<&mut RefCount>(entity) else {
            return;
        };
        debug_assert!(rc.0 > 0, "reference count underflow");
        if rc.0 == 0 {
            return;
        }
        rc.0 -= 1;
        if rc.0 == 0 {
            drop(rc);
            self.despawn_buffer.push(entity);
        }
    }

    /// Take an entity out of its registry and release the registry's
    /// reference. Returns false if it was not registered.
    pub fn remove_entity(&mut self, key: EntityKey) -> bool {
        let removed = match key {
            EntityKey::Creep(id) => self.creeps.remove(&id),
            EntityKey::Building(id) => self.buildings.remove(&id),
        };
        match removed {
            Some(entity) => {
                self.dec_ref(entity);
                true
            }
            None => false,
        }
    }

    /// Change gold by `amount` (positive = cost). On success a floating
    /// message is posted at `at`.
    pub fn transaction(&mut self, amount: i32, at: Vec2) -> bool {
        if !self.economy.transaction(amount) {
            return false;
        }
        let kind = if amount > 0 {
            MessageKind::Cost
        } else {
            MessageKind::Income
        };
        self.messages
            .push(FloatingMessage::new(at, amount.unsigned_abs().to_string(), kind));
        self.events.push(SimEvent::GoldChanged {
            amount,
            gold: self.economy.gold,
        });
        true
    }

    /// A creep got through: lose a life, ending the game at zero.
    pub fn mutilate(&mut self) {
        let lives = self.economy.mutilate();
        self.events.push(SimEvent::LifeLost { lives });
        if self.economy.is_defeated() && self.phase == GamePhase::Running {
            log::info!("Game over.");
            self.phase = GamePhase::GameOver;
            self.events.push(SimEvent::GameOver);
        }
    }

    /// Subtract `amount` hit points, killing the entity (credited to `by`)
    /// when they run out. Dead entities are left alone.
    pub fn damage(&mut self, entity: Entity, amount: f32, by: EntityKey) {
        let remaining = {
            let Ok(mut health) = self.ecs.get::<&mut Health>(entity) else {
                return;
            };
            if health.hp <= 0.0 {
                return;
            }
            health.hp -= amount;
            health.hp
        };
        if remaining <= 0.0 {
            self.kill(entity, KillCause::Slain { by });
        }
    }

    /// Remove a registered entity for `cause`. A creep slain by a building
    /// pays its bounty; a creep that escaped costs a life. Entities no
    /// longer registered are ignored, so nothing is paid or lost twice.
    pub fn kill(&mut self, entity: Entity, cause: KillCause) {
        let Some(key) = self.ecs.get::<&Identity>(entity).ok().map(|i| i.0) else {
            return;
        };
        if !self.is_registered(key, entity) {
            return;
        }

        log::debug!("Entity {key} was killed");

        if let EntityKey::Creep(_) = key {
            match cause {
                KillCause::Slain {
                    by: EntityKey::Building(_),
                } => {
                    let bounty = self
                        .ecs
                        .get::<&Stats>(entity)
                        .map(|s| s.blueprint.cost(s.level))
                        .unwrap_or(0);
                    if bounty > 0 {
                        let at = self.position(entity).unwrap_or_default();
                        self.transaction(-bounty, at);
                    }
                }
                KillCause::Slain { .. } => {}
                KillCause::Escaped => self.mutilate(),
            }
        }

        self.events.push(SimEvent::EntityKilled { entity: key, cause });
        self.remove_entity(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frobnicator_core::blueprint::LevelStats;
    use frobnicator_map::Tilemap;

    fn creep_blueprint() -> Arc<Blueprint> {
        Arc::new(
            Blueprint::new(
                "creep",
                vec![LevelStats {
                    hp: 10.0,
                    cost: 4,
                    ..Default::default()
                }],
            )
            .unwrap(),
        )
    }

    fn make_world() -> GameWorld {
        let tilemap = Tilemap::from_rows(48, 48, &["...."; 4]).unwrap();
        let mut towers = BTreeMap::new();
        towers.insert("arrow".to_string(), creep_blueprint());
        let level = Level::new("t", tilemap, vec![], creep_blueprint(), towers).unwrap();
        GameWorld::new(level, Economy::new(0, 2))
    }

    #[test]
    fn test_ids_count_up_per_kind() {
        let mut world = make_world();
        let bp = creep_blueprint();
        let a = world.spawn_creep(bp.clone(), 0, Vec2::ZERO, Vec2::ZERO);
        let b = world.spawn_creep(bp.clone(), 0, Vec2::ZERO, Vec2::ZERO);
        let t = world.spawn_building(bp, 0, Vec2::ZERO);
        assert_eq!(a.to_string(), "creep_0001");
        assert_eq!(b.to_string(), "creep_0002");
        assert_eq!(t.to_string(), "building_1");
    }

    #[test]
    fn test_pinned_entity_survives_removal() {
        let mut world = make_world();
        let id = world.spawn_creep(creep_blueprint(), 0, Vec2::ZERO, Vec2::ZERO);
        let entity = world.creeps[&id];

        world.inc_ref(entity);
        assert!(world.remove_entity(id.into()));
        assert!(world.find_entity(id.into()).is_none());
        assert_eq!(world.ref_count(entity), Some(1));
        assert!(world.despawn_buffer.is_empty());

        world.dec_ref(entity);
        assert_eq!(world.despawn_buffer, vec![entity]);
        assert!(!world.remove_entity(id.into()));
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut world = make_world();
        let id = world.spawn_creep(creep_blueprint(), 0, Vec2::ZERO, Vec2::ZERO);
        let entity = world.creeps[&id];
        world.inc_ref(entity);

        world.kill(entity, KillCause::Escaped);
        world.kill(entity, KillCause::Escaped);
        assert_eq!(world.economy.lives, 1);
    }

    #[test]
    fn test_damage_pays_bounty_once() {
        let mut world = make_world();
        let id = world.spawn_creep(creep_blueprint(), 0, Vec2::ZERO, Vec2::ZERO);
        let entity = world.creeps[&id];
        world.inc_ref(entity);
        let by = EntityKey::Building(BuildingId(9));

        world.damage(entity, 0.0, by);
        assert_eq!(world.hp(entity), Some(10.0));
        assert!(world.is_alive(entity));

        world.damage(entity, 15.0, by);
        assert!(!world.is_alive(entity));
        assert_eq!(world.economy.gold, 4);

        world.damage(entity, 15.0, by);
        assert_eq!(world.hp(entity), Some(-5.0));
        assert_eq!(world.economy.gold, 4);
        assert_eq!(world.messages.len(), 1);
    }
}
