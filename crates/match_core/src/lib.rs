//! # match_core - Real-time Football Match Simulation Core
//!
//! Fixed-timestep simulation of an arcade eleven-a-side match: ball physics
//! with goal-frame collisions, set-piece restarts, player contact and a
//! per-player AI state machine fed by freshly built perception every tick.
//!
//! ## Features
//! - 60 Hz fixed step driven from variable frame time
//! - One human-controlled player or a fully autonomous match
//! - Seeded per-player random sources for reproducible runs
//! - Audio, celebration and result storage behind injectable traits
//! - JSON API for headless matches

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use api::{simulate_match, simulate_match_json, MatchRequest, MatchResponse};
pub use engine::{
    Collaborators, ControlMode, MatchConfig, MatchEngine, MatchSnapshot, MatchState, PlayerInput,
};
pub use error::{MatchError, Result};
pub use models::{PlayerSheet, TeamSheet, TeamSide};
