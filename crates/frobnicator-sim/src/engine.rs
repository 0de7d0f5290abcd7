//! Simulation engine: the coordinator of one game.
//!
//! `SimulationEngine` owns the game world, applies player commands at tick
//! boundaries, runs all systems in a fixed order and produces
//! `FrameSnapshot`s. Completely headless, so games are deterministic and
//! testable without a window.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use frobnicator_core::commands::PlayerCommand;
use frobnicator_core::constants::*;
use frobnicator_core::enums::GamePhase;
use frobnicator_core::error::ActionError;
use frobnicator_core::state::FrameSnapshot;
use frobnicator_core::types::{BuildingId, SimTime, Vec2};
use frobnicator_map::Level;

use crate::actions;
use crate::economy::Economy;
use crate::systems;
use crate::systems::waves::WaveSchedule;
use crate::world::GameWorld;

/// Configuration for starting a new game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same game.
    pub seed: u64,
    pub starting_gold: i32,
    pub starting_lives: u32,
    /// Seconds before the first wave.
    pub first_wave_delay_secs: u32,
    /// Seconds between later waves.
    pub wave_interval_secs: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_gold: STARTING_GOLD,
            starting_lives: STARTING_LIVES,
            first_wave_delay_secs: FIRST_WAVE_DELAY_SECS,
            wave_interval_secs: WAVE_INTERVAL_SECS,
        }
    }
}

/// The simulation engine. Owns the world and all game state.
pub struct SimulationEngine {
    world: GameWorld,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    wave_schedule: WaveSchedule,
}

impl SimulationEngine {
    /// Start a game on `level`.
    pub fn new(config: SimConfig, level: Level) -> Self {
        log::info!("Starting \"{}\" with seed {}", level.title, config.seed);
        Self {
            world: GameWorld::new(
                level,
                Economy::new(config.starting_gold, config.starting_lives),
            ),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            wave_schedule: WaveSchedule::new(
                config.first_wave_delay_secs,
                config.wave_interval_secs,
            ),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the game by one tick.
    ///
    /// Returns the snapshot taken after commands are applied and before the
    /// world moves, which is what a renderer draws this frame. Once the game
    /// is over only commands and the snapshot are processed.
    pub fn tick(&mut self) -> FrameSnapshot {
        self.process_commands();

        let events = std::mem::take(&mut self.world.events);
        let snapshot = systems::snapshot::build_snapshot(&self.world, &self.wave_schedule, events);

        if self.world.phase == GamePhase::Running {
            self.run_systems();
        }
        snapshot
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn time(&self) -> SimTime {
        self.world.time
    }

    pub fn gold(&self) -> i32 {
        self.world.economy.gold
    }

    pub fn lives(&self) -> u32 {
        self.world.economy.lives
    }

    /// Most recently released wave.
    pub fn wave(&self) -> u32 {
        self.wave_schedule.wave
    }

    pub fn level(&self) -> &Level {
        &self.world.level
    }

    /// Read-only access to the world.
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Mutable access to the world (for tests setting up scenarios).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    /// Spend (positive) or earn (negative) gold, posting a floating message
    /// at `at`. Fails without side effects if gold would go negative.
    pub fn transaction(&mut self, amount: i32, at: Vec2) -> bool {
        self.world.transaction(amount, at)
    }

    pub fn place_tower(&mut self, kind: &str, x: u32, y: u32) -> Result<BuildingId, ActionError> {
        actions::place_tower(&mut self.world, kind, x, y)
    }

    pub fn upgrade_tower(&mut self, building: BuildingId) -> Result<usize, ActionError> {
        actions::upgrade_tower(&mut self.world, building)
    }

    pub fn sell_tower(&mut self, building: BuildingId) -> Result<i32, ActionError> {
        actions::sell_tower(&mut self.world, building)
    }

    pub fn can_upgrade(&self, building: BuildingId) -> bool {
        actions::can_upgrade(&self.world, building)
    }

    pub fn upgrade_cost(&self, building: BuildingId) -> Option<i32> {
        actions::upgrade_cost(&self.world, building)
    }

    pub fn sell_value(&self, building: BuildingId) -> Option<i32> {
        actions::sell_value(&self.world, building)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command. Refusals are logged; the command is
    /// dropped.
    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match &command {
            PlayerCommand::PlaceTower { kind, x, y } => self.place_tower(kind, *x, *y).map(drop),
            PlayerCommand::UpgradeTower { building } => self.upgrade_tower(*building).map(drop),
            PlayerCommand::SellTower { building } => self.sell_tower(*building).map(drop),
        };
        if let Err(err) = result {
            log::warn!("{command:?} refused: {err}");
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Creeps: movement, buffs, poison, region transitions
        systems::creeps::run(&mut self.world, DT);
        // 2. Towers: validate, fire, acquire
        systems::towers::run(&mut self.world);
        // 3. Projectiles: travel and impact
        systems::projectiles::run(&mut self.world, DT);
        // 4. Floating messages
        systems::messages::run(&mut self.world, DT);
        // 5. Clock, then any wave that has come due
        self.world.time.advance();
        systems::waves::run(&mut self.world, &mut self.rng, &mut self.wave_schedule);
        // 6. Cleanup (entities released this tick)
        systems::cleanup::run(&mut self.world);
    }
}
