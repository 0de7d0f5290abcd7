//! Projectiles: travelling shots from a building to a creep.
//!
//! A projectile is not an entity. It lives in the world's projectile list
//! and pins both its target and the building that fired it until it lands.

use hecs::Entity;

use frobnicator_core::constants::{CREEP_CENTER_OFFSET, PROJECTILE_LENGTH, PROJECTILE_SPEED};
use frobnicator_core::types::{Buff, BuildingId, CreepId, Vec2};

/// Slack on the arrival check so travel time summed from f32 ticks does
/// not land a frame late. Well under one tick.
const ARRIVAL_TOLERANCE: f32 = 1e-3;

/// Effect of a shot, captured when it is fired. Later upgrades or a sale
/// of the building do not change what an in-flight shot does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub damage: f32,
    /// Radius around the target's position that also takes `damage`.
    pub splash: f32,
    pub slow: Option<Buff>,
    pub poison: Option<Buff>,
    /// Building credited with the damage.
    pub attacker: BuildingId,
}

/// Result of advancing a projectile one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStatus {
    InFlight,
    /// The impact must be applied now and the projectile dropped.
    Arrived,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub source: Vec2,
    /// Pinned target creep.
    pub target: Entity,
    pub target_id: CreepId,
    /// Pinned building that fired the shot.
    pub building: Entity,
    pub impact: Impact,
    speed: f32,
    length: f32,
    elapsed: f32,
    delay: f32,
}

impl Projectile {
    /// Create a projectile from `source` toward a target currently at
    /// `target_pos`. Travel time is fixed here; the target may move after.
    pub fn new(
        source: Vec2,
        target: Entity,
        target_id: CreepId,
        target_pos: Vec2,
        building: Entity,
        impact: Impact,
    ) -> Self {
        Self::with_speed(
            source,
            target,
            target_id,
            target_pos,
            building,
            impact,
            PROJECTILE_SPEED,
        )
    }

    pub fn with_speed(
        source: Vec2,
        target: Entity,
        target_id: CreepId,
        target_pos: Vec2,
        building: Entity,
        impact: Impact,
        speed: f32,
    ) -> Self {
        let delay = if speed > 0.0 {
            source.distance(target_pos) / speed
        } else {
            0.0
        };
        Self {
            source,
            target,
            target_id,
            building,
            impact,
            speed,
            length: PROJECTILE_LENGTH,
            elapsed: 0.0,
            delay,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Seconds of travel needed to reach the target.
    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Report arrival once the travel time has been used up; otherwise
    /// spend `dt` more of it. Arrival is reported on the tick after the
    /// threshold is reached, never retroactively.
    pub fn tick(&mut self, dt: f32) -> ProjectileStatus {
        if self.elapsed + ARRIVAL_TOLERANCE >= self.delay {
            return ProjectileStatus::Arrived;
        }
        self.elapsed += dt;
        ProjectileStatus::InFlight
    }

    /// Tail and head of the streak for drawing, given where the target is now.
    pub fn endpoints(&self, target_pos: Vec2) -> (Vec2, Vec2) {
        let dst = target_pos + Vec2::splat(CREEP_CENTER_OFFSET);
        let s = if self.delay > 0.0 {
            self.elapsed / self.delay
        } else {
            1.0
        };
        let distance = self.source.distance(dst);
        let l = if distance > 0.0 {
            self.length / distance
        } else {
            0.0
        };
        let tail = self.source.lerp(dst, s.min(1.0));
        let head = self.source.lerp(dst, (s + l).min(1.0));
        (tail, head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frobnicator_core::constants::DT;

    fn make_projectile(target_pos: Vec2) -> Projectile {
        let mut world = hecs::World::new();
        let target = world.spawn(());
        let building = world.spawn(());
        Projectile::new(
            Vec2::ZERO,
            target,
            CreepId(1),
            target_pos,
            building,
            Impact {
                damage: 1.0,
                splash: 0.0,
                slow: None,
                poison: None,
                attacker: BuildingId(1),
            },
        )
    }

    #[test]
    fn test_arrives_after_full_travel_time() {
        let mut p = make_projectile(Vec2::new(700.0, 0.0));
        assert!((p.delay() - 1.0).abs() < 1e-6);

        for _ in 0..4 {
            assert_eq!(p.tick(0.25), ProjectileStatus::InFlight);
        }
        assert_eq!(p.tick(0.25), ProjectileStatus::Arrived);
    }

    #[test]
    fn test_arrives_on_time_at_tick_rate() {
        // One second of travel: sixty ticks in flight, lands on the next.
        let mut p = make_projectile(Vec2::new(700.0, 0.0));
        for tick in 1..=60 {
            assert_eq!(p.tick(DT), ProjectileStatus::InFlight, "tick {tick}");
        }
        assert_eq!(p.tick(DT), ProjectileStatus::Arrived);
    }

    #[test]
    fn test_large_step_does_not_arrive_early() {
        let mut p = make_projectile(Vec2::new(70.0, 0.0));
        // One big step overshoots the delay but arrival waits for the next tick.
        assert_eq!(p.tick(5.0), ProjectileStatus::InFlight);
        assert_eq!(p.tick(5.0), ProjectileStatus::Arrived);
    }

    #[test]
    fn test_zero_distance_arrives_immediately() {
        let mut p = make_projectile(Vec2::ZERO);
        assert_eq!(p.tick(1.0 / 60.0), ProjectileStatus::Arrived);
    }

    #[test]
    fn test_endpoints_move_toward_target() {
        let mut p = make_projectile(Vec2::new(676.0, -24.0));
        let (tail0, head0) = p.endpoints(Vec2::new(676.0, -24.0));
        assert_eq!(tail0, Vec2::ZERO);
        assert!((head0.x - PROJECTILE_LENGTH).abs() < 1e-3);

        p.tick(0.5);
        let (tail, head) = p.endpoints(Vec2::new(676.0, -24.0));
        assert!(tail.x > 300.0 && tail.x < 400.0);
        assert!(head.x > tail.x);
    }
}
