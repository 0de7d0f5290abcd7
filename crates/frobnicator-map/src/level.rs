//! Level: tilemap, regions, wave table and tower catalogue for one map.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;

use frobnicator_core::blueprint::Blueprint;
use frobnicator_core::constants::CREEP_SPAWN_SIZE;
use frobnicator_core::enums::RegionKind;
use frobnicator_core::error::ContentError;
use frobnicator_core::types::{IVec2, Vec2};

use crate::region::Region;
use crate::tilemap::Tilemap;

/// Everything needed to create one creep. The simulation turns these into
/// entities and assigns ids.
#[derive(Debug, Clone, PartialEq)]
pub struct CreepSpawn {
    /// Top-left corner inside the spawnpoint.
    pub position: Vec2,
    /// Middle of the first waypoint to head for.
    pub destination: Vec2,
    /// Index into the wave blueprint.
    pub level: usize,
}

/// A loaded map.
#[derive(Debug, Clone)]
pub struct Level {
    pub title: String,
    pub tilemap: Tilemap,
    /// Waves are levels of this blueprint; wave N spawns `amount(N)` creeps
    /// with the stats of level N.
    pub waves: Arc<Blueprint>,
    waypoints: BTreeMap<String, Region>,
    spawnpoints: BTreeMap<String, Region>,
    towers: BTreeMap<String, Arc<Blueprint>>,
}

impl Level {
    pub fn new(
        title: impl Into<String>,
        tilemap: Tilemap,
        regions: Vec<Region>,
        waves: Arc<Blueprint>,
        towers: BTreeMap<String, Arc<Blueprint>>,
    ) -> Result<Self, ContentError> {
        if towers.is_empty() {
            return Err(ContentError::NoTowers);
        }

        let mut waypoints = BTreeMap::new();
        let mut spawnpoints = BTreeMap::new();
        for region in regions {
            if waypoints.contains_key(&region.name) || spawnpoints.contains_key(&region.name) {
                return Err(ContentError::DuplicateRegion { name: region.name });
            }
            let table = match region.kind {
                RegionKind::Waypoint => &mut waypoints,
                RegionKind::Spawnpoint => &mut spawnpoints,
            };
            table.insert(region.name.clone(), region);
        }

        Ok(Self {
            title: title.into(),
            tilemap,
            waves,
            waypoints,
            spawnpoints,
            towers,
        })
    }

    pub fn waypoints(&self) -> &BTreeMap<String, Region> {
        &self.waypoints
    }

    pub fn spawnpoints(&self) -> &BTreeMap<String, Region> {
        &self.spawnpoints
    }

    pub fn towers(&self) -> &BTreeMap<String, Arc<Blueprint>> {
        &self.towers
    }

    pub fn tower(&self, kind: &str) -> Option<&Arc<Blueprint>> {
        self.towers.get(kind)
    }

    pub fn find_waypoint(&self, name: &str) -> Option<&Region> {
        self.waypoints.get(name)
    }

    /// All regions, waypoints first, each group in name order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.waypoints.values().chain(self.spawnpoints.values())
    }

    /// First region (in [`Level::regions`] order) that fully contains a box
    /// of `size` at `pos`.
    pub fn region_at(&self, pos: Vec2, size: Vec2) -> Option<&Region> {
        self.regions().find(|r| r.contains(pos, size, true))
    }

    /// Whether `wave` has a row in the wave table.
    pub fn has_wave(&self, wave: u32) -> bool {
        (wave as usize) < self.waves.num_levels()
    }

    /// Spawn descriptors for one wave at one spawnpoint.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        wave: u32,
        spawnpoint: &Region,
        rng: &mut R,
    ) -> Vec<CreepSpawn> {
        if !self.has_wave(wave) {
            log::warn!("Wave not defined");
            return Vec::new();
        }

        let level = wave as usize;
        let amount = self.waves.amount(level);
        log::info!("Spawning {amount} units at {}", spawnpoint.name);

        let destination = match spawnpoint.next.as_deref() {
            Some(next) => match self.find_waypoint(next) {
                Some(wp) => wp.middle(),
                None => {
                    log::warn!(
                        "Spawnpoint '{}' refers to non-existing waypoint '{next}', ignored.",
                        spawnpoint.name
                    );
                    spawnpoint.middle()
                }
            },
            None => spawnpoint.middle(),
        };

        (0..amount)
            .map(|_| CreepSpawn {
                position: spawnpoint.random_point(rng, IVec2::splat(CREEP_SPAWN_SIZE)),
                destination,
                level,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frobnicator_core::blueprint::LevelStats;
    use frobnicator_core::types::Rect;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn blueprint(label: &str, amounts: &[u32]) -> Arc<Blueprint> {
        let levels = amounts
            .iter()
            .map(|&amount| LevelStats {
                amount,
                ..Default::default()
            })
            .collect();
        Arc::new(Blueprint::new(label, levels).unwrap())
    }

    fn region(name: &str, kind: RegionKind, rect: Rect, next: Option<&str>) -> Region {
        Region::new(name, kind, rect, next.map(str::to_string), None).unwrap()
    }

    fn make_level(spawn_next: Option<&str>) -> Level {
        let tilemap = Tilemap::from_rows(48, 48, &["........"; 8]).unwrap();
        let mut towers = BTreeMap::new();
        towers.insert("arrow".to_string(), blueprint("arrow", &[0, 0]));
        Level::new(
            "test",
            tilemap,
            vec![
                region("a", RegionKind::Waypoint, Rect::new(0, 0, 96, 96), Some("middle")),
                region("middle", RegionKind::Waypoint, Rect::new(192, 192, 96, 96), None),
                region("s", RegionKind::Spawnpoint, Rect::new(0, 288, 96, 96), spawn_next),
            ],
            blueprint("waves", &[0, 3, 5]),
            towers,
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let tilemap = Tilemap::from_rows(48, 48, &["."]).unwrap();
        let mut towers = BTreeMap::new();
        towers.insert("arrow".to_string(), blueprint("arrow", &[0]));
        let rect = Rect::new(0, 0, 10, 10);
        let err = Level::new(
            "dup",
            tilemap,
            vec![
                region("a", RegionKind::Waypoint, rect, None),
                region("a", RegionKind::Waypoint, rect, None),
            ],
            blueprint("waves", &[0]),
            towers,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateRegion { .. }));
    }

    #[test]
    fn test_waypoint_and_spawnpoint_share_name_rejected() {
        let tilemap = Tilemap::from_rows(48, 48, &["."]).unwrap();
        let mut towers = BTreeMap::new();
        towers.insert("arrow".to_string(), blueprint("arrow", &[0]));
        let err = Level::new(
            "dup",
            tilemap,
            vec![
                region("gate", RegionKind::Spawnpoint, Rect::new(0, 0, 10, 10), None),
                region("gate", RegionKind::Waypoint, Rect::new(20, 0, 10, 10), None),
            ],
            blueprint("waves", &[0]),
            towers,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DuplicateRegion { name } if name == "gate"));
    }

    #[test]
    fn test_level_without_towers_rejected() {
        let tilemap = Tilemap::from_rows(48, 48, &["."]).unwrap();
        let err = Level::new("bare", tilemap, vec![], blueprint("waves", &[0]), BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, ContentError::NoTowers));
    }

    #[test]
    fn test_spawn_count_and_destination() {
        let level = make_level(Some("a"));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sp = &level.spawnpoints()["s"];
        let batch = level.spawn(2, sp, &mut rng);
        assert_eq!(batch.len(), 5);
        for spawn in &batch {
            assert_eq!(spawn.destination, Vec2::new(48.0, 48.0));
            assert_eq!(spawn.level, 2);
            assert!(sp.contains(spawn.position, Vec2::splat(48.0), true));
        }
    }

    #[test]
    fn test_spawn_beyond_table_is_empty() {
        let level = make_level(Some("a"));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sp = &level.spawnpoints()["s"];
        assert!(level.spawn(3, sp, &mut rng).is_empty());
    }

    #[test]
    fn test_spawn_with_bad_next_aims_at_spawnpoint() {
        let level = make_level(Some("nowhere"));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sp = &level.spawnpoints()["s"];
        let batch = level.spawn(1, sp, &mut rng);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].destination, sp.middle());
    }

    #[test]
    fn test_region_at_prefers_waypoints() {
        let level = make_level(None);
        let size = Vec2::splat(47.0);
        assert_eq!(
            level.region_at(Vec2::new(10.0, 10.0), size).map(|r| r.name.as_str()),
            Some("a")
        );
        assert_eq!(
            level.region_at(Vec2::new(10.0, 300.0), size).map(|r| r.name.as_str()),
            Some("s")
        );
        // Straddling an edge is not inside.
        assert!(level.region_at(Vec2::new(60.0, 10.0), size).is_none());
    }
}
