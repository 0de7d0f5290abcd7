//! Core types and definitions for the frobnicator tower-defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, blueprints, commands, state snapshots, events, errors and
//! constants. It has no dependency on any runtime framework.

pub mod blueprint;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
