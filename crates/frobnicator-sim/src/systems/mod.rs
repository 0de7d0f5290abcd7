//! Systems that advance the game world each tick.
//!
//! Systems are free functions over `&mut GameWorld` (or `&GameWorld` for
//! read-only passes). They keep no state of their own apart from the wave
//! schedule, which the engine owns.

pub mod cleanup;
pub mod creeps;
pub mod messages;
pub mod projectiles;
pub mod snapshot;
pub mod towers;
pub mod waves;
