//! Wave spawning system: releases waves of creeps on a fixed cadence.

use rand_chacha::ChaCha8Rng;

use frobnicator_core::constants::TICK_RATE;
use frobnicator_core::events::SimEvent;
use frobnicator_map::CreepSpawn;

use crate::world::GameWorld;

/// When the next wave is due and which one it is.
#[derive(Debug, Clone)]
pub struct WaveSchedule {
    /// Most recently released wave; 0 before the first.
    pub wave: u32,
    /// Tick at which the next wave is released.
    pub next_spawn_tick: u64,
    /// Ticks between waves after the first.
    pub interval_ticks: u64,
}

impl WaveSchedule {
    pub fn new(first_delay_secs: u32, interval_secs: u32) -> Self {
        Self {
            wave: 0,
            next_spawn_tick: u64::from(first_delay_secs) * u64::from(TICK_RATE),
            interval_ticks: u64::from(interval_secs) * u64::from(TICK_RATE),
        }
    }

    pub fn is_due(&self, tick: u64) -> bool {
        tick >= self.next_spawn_tick
    }

    /// Whole seconds (rounded up) until the next wave.
    pub fn secs_until_next(&self, tick: u64) -> u32 {
        let ticks = self.next_spawn_tick.saturating_sub(tick);
        ticks.div_ceil(u64::from(TICK_RATE)) as u32
    }
}

/// Release the next wave at every spawnpoint if it is due.
pub fn run(world: &mut GameWorld, rng: &mut ChaCha8Rng, schedule: &mut WaveSchedule) {
    if !schedule.is_due(world.time.tick) {
        return;
    }
    schedule.wave += 1;
    schedule.next_spawn_tick += schedule.interval_ticks;
    let wave = schedule.wave;

    log::info!("Spawning wave {wave}");
    let level = &world.level;
    let spawns: Vec<CreepSpawn> = level
        .spawnpoints()
        .values()
        .flat_map(|sp| level.spawn(wave, sp, rng))
        .collect();

    let blueprint = world.level.waves.clone();
    for spawn in &spawns {
        world.spawn_creep(
            blueprint.clone(),
            spawn.level,
            spawn.position,
            spawn.destination,
        );
    }
    world.events.push(SimEvent::WaveSpawned {
        wave,
        count: spawns.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_countdown() {
        let schedule = WaveSchedule::new(5, 15);
        assert_eq!(schedule.next_spawn_tick, 300);
        assert_eq!(schedule.secs_until_next(0), 5);
        assert_eq!(schedule.secs_until_next(241), 1);
        assert_eq!(schedule.secs_until_next(300), 0);
        assert!(!schedule.is_due(299));
        assert!(schedule.is_due(300));
    }
}
