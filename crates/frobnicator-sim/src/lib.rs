//! Simulation engine for Frobnicator.
//!
//! Owns the hecs ECS world and the creep/building registries, runs systems
//! at a fixed tick rate, and produces FrameSnapshots for the frontend.

pub mod actions;
pub mod economy;
pub mod engine;
pub mod projectile;
pub mod systems;
pub mod world;

pub use engine::{SimConfig, SimulationEngine};
pub use frobnicator_core as core;
pub use world::GameWorld;
