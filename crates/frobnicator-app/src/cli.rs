//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use frobnicator_core::commands::PlayerCommand;

/// Headless tower defense: loads a level and plays it out on the terminal.
#[derive(Debug, Parser)]
#[command(name = "frobnicator", version)]
pub struct Args {
    /// Level definition, relative to the data directory unless absolute.
    #[arg(default_value = "maul.json")]
    pub level: String,

    /// Directory content paths are resolved against. Defaults to $DATA_DIR,
    /// then `data`.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// JSON file with simulation settings (seed, starting gold, wave timing).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// RNG seed; overrides the config file.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many ticks.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Run as fast as possible instead of at 60 ticks per second.
    #[arg(long)]
    pub unpaced: bool,

    /// Place a tower before the first tick, e.g. `arrow@2,3`. Repeatable.
    #[arg(long = "build", value_name = "KIND@X,Y")]
    pub build: Vec<BuildOrder>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// A scripted tower placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOrder {
    pub kind: String,
    pub x: u32,
    pub y: u32,
}

impl BuildOrder {
    pub fn to_command(&self) -> PlayerCommand {
        PlayerCommand::PlaceTower {
            kind: self.kind.clone(),
            x: self.x,
            y: self.y,
        }
    }
}

impl FromStr for BuildOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, tile) = s
            .split_once('@')
            .ok_or_else(|| format!("expected KIND@X,Y, got '{s}'"))?;
        let (x, y) = tile
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y after '@', got '{tile}'"))?;
        if kind.is_empty() {
            return Err(format!("missing tower kind in '{s}'"));
        }
        let x = x
            .trim()
            .parse()
            .map_err(|e| format!("bad column '{x}': {e}"))?;
        let y = y
            .trim()
            .parse()
            .map_err(|e| format!("bad row '{y}': {e}"))?;
        Ok(Self {
            kind: kind.to_string(),
            x,
            y,
        })
    }
}
