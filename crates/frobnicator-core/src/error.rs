//! Error types for content loading and player actions.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::BuildingId;

/// Problems with definition files. Fatal at load time.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed definition in `{path}`")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("blueprint `{label}` has no levels")]
    EmptyBlueprint { label: String },
    #[error("tilemap has no rows")]
    EmptyTilemap,
    #[error("tilemap row {row} is {found} tiles wide, expected {expected}")]
    RaggedTilemap {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("region `{name}` is defined more than once")]
    DuplicateRegion { name: String },
    #[error("region `{name}` has non-positive size {w}x{h}")]
    InvalidRegion { name: String, w: i32, h: i32 },
    #[error("level defines no tower blueprints")]
    NoTowers,
}

/// Reasons a player action was refused. Recoverable; state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not enough gold: cost {cost}, have {gold}")]
    InsufficientGold { cost: i32, gold: i32 },
    #[error("cannot build at tile ({x},{y})")]
    Blocked { x: u32, y: u32 },
    #[error("no tower blueprint named `{0}`")]
    UnknownTower(String),
    #[error("no building {0}")]
    UnknownBuilding(BuildingId),
    #[error("{0} is already at its highest level")]
    MaxLevel(BuildingId),
    #[error("the game is over")]
    GameOver,
}
