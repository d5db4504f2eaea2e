//! Core traits and types for the grid arcade engines
//!
//! This crate provides the abstractions every game crate builds on:
//! - `Game`: Typed trait with value-in/value-out transitions
//! - `ErasedGame`: Runtime capability (`apply_input`, `tick`, `snapshot`, `restart`)
//! - `GameAdapter`: Live engine instance converting typed games to the erased interface
//! - `Registry`: Name-keyed factories for selecting a game at runtime

pub mod adapter;
pub mod erased;
pub mod grid;
pub mod registry;
pub mod snapshot;
pub mod status;
pub mod typed;

// Re-export main types for convenience
pub use adapter::GameAdapter;
pub use erased::{ErasedGame, ErasedGameError};
pub use grid::{Coord, Direction};
pub use registry::{create_game, register_game, GameFactory, Registry};
pub use snapshot::{Cell, Snapshot};
pub use status::{GameStatus, Outcome, Player};
pub use typed::{BoardShape, Capabilities, ConfigError, EngineId, Game};
