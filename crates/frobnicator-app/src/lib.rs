//! Frobnicator host application.
//!
//! Loads a level, hands it to the simulation engine and drives the engine
//! from a fixed-rate loop, reporting progress through the log.

pub mod cli;
pub mod game_loop;
pub mod logger;

pub use frobnicator_core as core;
