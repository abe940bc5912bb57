//! Core engine types: entities, players, state, RNG, configuration.
//!
//! This module contains the building blocks every other module shares.
//! Matches are tuned through `MatchConfig` rather than by modifying the core.

pub mod config;
pub mod entity;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{MatchConfig, ResolutionTrigger};
pub use entity::{InstanceId, Zone};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{ActiveSynergy, GameLog, GameState, PlayerState};
