//! Game loop: drives the simulation engine at 60Hz and reports a HUD line.
//!
//! There is no window. Each tick's snapshot is inspected for events and a
//! status line is logged once per simulated second.

use std::time::{Duration, Instant};

use frobnicator_core::constants::TICK_RATE;
use frobnicator_core::enums::GamePhase;
use frobnicator_core::state::FrameSnapshot;
use frobnicator_sim::engine::SimulationEngine;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Ticks between HUD reports.
const HUD_INTERVAL: u64 = TICK_RATE as u64;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopConfig {
    /// Stop after this many ticks; run until game over if `None`.
    pub max_ticks: Option<u64>,
    /// Sleep between ticks to hold the nominal rate.
    pub paced: bool,
}

/// Where the loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub phase: GamePhase,
    pub gold: i32,
    pub lives: u32,
    pub wave: u32,
}

/// Run until game over or `max_ticks`.
pub fn run(engine: &mut SimulationEngine, config: LoopConfig) -> LoopSummary {
    let mut next_tick_time = Instant::now();
    let mut ticks = 0;

    loop {
        if config.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }

        // 1. Advance one tick
        let snapshot = engine.tick();
        ticks += 1;

        // 2. Report
        for event in &snapshot.events {
            log::debug!("{event:?}");
        }
        if ticks % HUD_INTERVAL == 0 {
            log::info!("{}", hud_line(&snapshot));
        }
        if snapshot.phase == GamePhase::GameOver {
            break;
        }

        // 3. Sleep until next tick
        if config.paced {
            let (next, sleep) = schedule(next_tick_time, Instant::now());
            next_tick_time = next;
            if let Some(duration) = sleep {
                std::thread::sleep(duration);
            }
        }
    }

    LoopSummary {
        ticks,
        phase: engine.phase(),
        gold: engine.gold(),
        lives: engine.lives(),
        wave: engine.wave(),
    }
}

/// Advance the deadline by one tick. Returns the new deadline and how long
/// to sleep, if at all. A loop more than two ticks behind resets to `now`
/// instead of catching up.
pub fn schedule(next_tick_time: Instant, now: Instant) -> (Instant, Option<Duration>) {
    let next = next_tick_time + TICK_DURATION;
    if next > now {
        (next, Some(next - now))
    } else if now - next > TICK_DURATION * 2 {
        (now, None)
    } else {
        (next, None)
    }
}

/// One-line status: gold, lives, wave countdown and creeps on the field.
pub fn hud_line(snapshot: &FrameSnapshot) -> String {
    format!(
        "t={:.1}s gold {} lives {} wave {} (next in {}s) creeps {}",
        snapshot.time.elapsed_secs,
        snapshot.gold,
        snapshot.lives,
        snapshot.wave,
        snapshot.next_wave_secs,
        snapshot.creep_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use frobnicator_map::ContentLoader;
    use frobnicator_sim::engine::SimConfig;

    fn sample_engine() -> SimulationEngine {
        let loader = ContentLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data"));
        SimulationEngine::new(SimConfig::default(), loader.load_level("maul.json").unwrap())
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.666ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }

    #[test]
    fn test_schedule_sleeps_only_when_ahead() {
        let start = Instant::now();

        let (next, sleep) = schedule(start, start);
        assert_eq!(next, start + TICK_DURATION);
        assert_eq!(sleep, Some(TICK_DURATION));

        // Slightly late: keep the cadence, no sleep.
        let late = start + TICK_DURATION * 2;
        let (next, sleep) = schedule(start, late);
        assert_eq!(next, start + TICK_DURATION);
        assert_eq!(sleep, None);

        // Far behind: reset.
        let far = start + TICK_DURATION * 10;
        let (next, sleep) = schedule(start, far);
        assert_eq!(next, far);
        assert_eq!(sleep, None);
    }

    #[test]
    fn test_run_stops_at_tick_limit() {
        let mut engine = sample_engine();
        let summary = run(
            &mut engine,
            LoopConfig {
                max_ticks: Some(400),
                paced: false,
            },
        );
        assert_eq!(summary.ticks, 400);
        assert_eq!(summary.phase, GamePhase::Running);
        assert_eq!(summary.wave, 1);
        assert_eq!(engine.time().tick, 400);
    }

    #[test]
    fn test_hud_line() {
        let mut engine = sample_engine();
        let snapshot = engine.tick();
        assert_eq!(
            hud_line(&snapshot),
            "t=0.0s gold 30 lives 100 wave 0 (next in 5s) creeps 0"
        );
    }

    #[test]
    fn test_snapshot_after_first_wave_serializes() {
        let mut engine = sample_engine();
        for _ in 0..400 {
            engine.tick();
        }

        let snapshot = engine.tick();
        assert_eq!(snapshot.wave, 1);
        assert!(snapshot.creep_count > 0);
        assert_eq!(snapshot.entities.len(), snapshot.creep_count);

        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.creep_count, snapshot.creep_count);
        assert_eq!(decoded.regions.len(), snapshot.regions.len());
    }
}
