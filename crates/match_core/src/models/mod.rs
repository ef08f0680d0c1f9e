pub mod player;
pub mod team;

pub use player::{
    Body, ChargeState, Flank, Player, PlayerId, PositionRole, Skills, TacticalRole, TeamSide,
};
pub use team::{formation_positions, PlayerSheet, Team, TeamSheet, STARTERS_PER_TEAM};
