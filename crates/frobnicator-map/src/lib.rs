//! Level content for Frobnicator.
//!
//! Regions, tilemap, the level aggregate and JSON loading.

pub use frobnicator_core as core;

pub mod level;
pub mod loader;
pub mod region;
pub mod tilemap;

// Re-export key types for convenience.
pub use level::{CreepSpawn, Level};
pub use loader::ContentLoader;
pub use region::Region;
pub use tilemap::Tilemap;
