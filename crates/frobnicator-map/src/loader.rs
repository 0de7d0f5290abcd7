//! JSON content loading: blueprints and levels.
//!
//! Relative file names resolve against the data directory, taken from the
//! `DATA_DIR` environment variable when the host does not supply one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use frobnicator_core::blueprint::{Blueprint, LevelOverrides};
use frobnicator_core::enums::RegionKind;
use frobnicator_core::error::ContentError;
use frobnicator_core::types::Rect;

use crate::level::Level;
use crate::region::Region;
use crate::tilemap::Tilemap;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Data directory used when neither the host nor the environment names one.
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Deserialize)]
struct LevelFile {
    #[serde(default = "untitled")]
    title: String,
    tilemap: TilemapFile,
    #[serde(default)]
    waypoints: Vec<RegionFile>,
    #[serde(default)]
    spawnpoints: Vec<RegionFile>,
    /// Wave table file name.
    waves: String,
    /// Tower kind -> blueprint file name.
    towers: BTreeMap<String, String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

fn untitled() -> String {
    "untitled level".to_string()
}

#[derive(Debug, Deserialize)]
struct TilemapFile {
    tile_width: u32,
    tile_height: u32,
    rows: Vec<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RegionFile {
    name: String,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    next: Option<String>,
    inner: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

/// Resolves and reads content files from one data directory.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    data_dir: PathBuf,
}

impl ContentLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loader rooted at `$DATA_DIR`, or [`DEFAULT_DATA_DIR`] if unset.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::new(dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Absolute paths are returned as-is; anything else is joined onto the
    /// data directory.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    fn read(&self, name: &str) -> Result<(PathBuf, String), ContentError> {
        let path = self.resolve(name);
        let text = std::fs::read_to_string(&path).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((path, text))
    }

    /// Load a blueprint file: a JSON list of level entries.
    pub fn load_blueprint(&self, name: &str) -> Result<Arc<Blueprint>, ContentError> {
        log::info!("Loading blueprint `{name}'");
        let (path, text) = self.read(name)?;
        let blueprint = parse_blueprint(name, &path, &text)?;
        log::info!("  * {} levels loaded", blueprint.num_levels());
        for (n, level) in blueprint.levels().iter().enumerate() {
            log::debug!("    {n:2}: {}", level.name);
        }
        Ok(Arc::new(blueprint))
    }

    /// Load a level together with the wave table and tower blueprints it
    /// names.
    pub fn load_level(&self, name: &str) -> Result<Level, ContentError> {
        log::info!("Loading level `{name}'.");
        let (path, text) = self.read(name)?;
        let file: LevelFile =
            serde_json::from_str(&text).map_err(|source| ContentError::Parse {
                path: path.clone(),
                source,
            })?;
        warn_unknown(name, &file.unknown);
        warn_unknown(&format!("{name}: tilemap"), &file.tilemap.unknown);

        let tilemap = Tilemap::from_rows(
            file.tilemap.tile_width,
            file.tilemap.tile_height,
            &file.tilemap.rows,
        )?;
        log::info!(
            "  * tilemap {}x{} tiles of {}x{}",
            tilemap.width(),
            tilemap.height(),
            tilemap.tile_width(),
            tilemap.tile_height()
        );

        let mut regions = Vec::with_capacity(file.waypoints.len() + file.spawnpoints.len());
        for def in file.waypoints {
            regions.push(region_from_file(name, def, RegionKind::Waypoint)?);
        }
        for def in file.spawnpoints {
            regions.push(region_from_file(name, def, RegionKind::Spawnpoint)?);
        }

        let waves = self.load_blueprint(&file.waves)?;
        let mut towers = BTreeMap::new();
        for (kind, blueprint) in &file.towers {
            towers.insert(kind.clone(), self.load_blueprint(blueprint)?);
        }

        let level = Level::new(file.title, tilemap, regions, waves, towers)?;
        log::info!(
            "  * {} waypoints, {} spawnpoints, {} tower kinds",
            level.waypoints().len(),
            level.spawnpoints().len(),
            level.towers().len()
        );
        log::info!("Loaded level \"{}\".", level.title);
        Ok(level)
    }
}

/// Parse blueprint JSON. `label` names the blueprint in logs and errors.
pub fn parse_blueprint(label: &str, path: &Path, text: &str) -> Result<Blueprint, ContentError> {
    let entries: Vec<LevelOverrides> =
        serde_json::from_str(text).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    for (n, entry) in entries.iter().enumerate() {
        warn_unknown(&format!("{label}: level {n}"), &entry.unknown);
    }
    Blueprint::from_overrides(label, &entries)
}

fn region_from_file(
    file: &str,
    def: RegionFile,
    kind: RegionKind,
) -> Result<Region, ContentError> {
    warn_unknown(&format!("{file}: region {}", def.name), &def.unknown);
    Region::new(
        def.name,
        kind,
        Rect::new(def.x, def.y, def.w, def.h),
        def.next,
        def.inner,
    )
}

fn warn_unknown(context: &str, unknown: &BTreeMap<String, serde_json::Value>) {
    for key in unknown.keys() {
        log::warn!("{context}: unhandled key `{key}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let loader = ContentLoader::new("/srv/game/data");
        assert_eq!(
            loader.resolve("maul.json"),
            PathBuf::from("/srv/game/data/maul.json")
        );
        assert_eq!(loader.resolve("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn test_parse_blueprint_inherits_levels() {
        let bp = parse_blueprint(
            "ice",
            Path::new("ice.json"),
            r#"[{"name": "Ice", "slow": 0.5, "slow_duration": 2}, {"cost": 15}]"#,
        )
        .unwrap();
        assert_eq!(bp.num_levels(), 2);
        assert_eq!(bp.name(1), "Ice");
        assert_eq!(bp.stat(1).slow, 0.5);
        assert_eq!(bp.cost(1), 15);
    }

    #[test]
    fn test_parse_blueprint_reports_path() {
        let err = parse_blueprint("bad", Path::new("bad.json"), "{").unwrap_err();
        match err {
            ContentError::Parse { path, .. } => assert_eq!(path, PathBuf::from("bad.json")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let loader = ContentLoader::new("/nonexistent-frobnicator-dir");
        let err = loader.load_blueprint("nothing.json").unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn test_load_sample_level() {
        let loader = ContentLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data"));
        let level = loader.load_level("maul.json").unwrap();
        assert!(level.waypoints().contains_key("middle"));
        assert!(!level.spawnpoints().is_empty());
        assert!(level.tower("arrow").is_some());
        assert!(level.tower("ice").is_some());
        assert!(level.waves.num_levels() > 1);
        for sp in level.spawnpoints().values() {
            let next = sp.next.as_deref().unwrap();
            assert!(level.find_waypoint(next).is_some(), "{} -> {next}", sp.name);
        }
        for wp in level.waypoints().values() {
            if let Some(next) = wp.next.as_deref() {
                assert!(level.find_waypoint(next).is_some(), "{} -> {next}", wp.name);
            }
            if let Some(inner) = wp.inner.as_deref() {
                assert!(level.find_waypoint(inner).is_some(), "{} -> {inner}", wp.name);
            }
        }
    }
}
