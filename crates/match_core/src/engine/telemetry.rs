//! Read-only views of the match for rendering and logging

use super::clock::ClockReading;
use super::collaborators::CameraOverride;
use super::geometry::Vec2;
use super::match_state::MatchState;
use super::physics_constants::player as pc;
use super::restart::{Restart, RestartKind, RestartPhase};
use crate::models::{Player, PlayerId, TacticalRole, TeamSide};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn add(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.home += 1,
            TeamSide::Away => self.away += 1,
        }
    }

    pub fn of(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }
}

/// Animation the renderer should play for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    Idle,
    Running,
    KnockedDown,
    Charging,
    Celebrating,
}

impl AnimationState {
    pub fn of(player: &Player) -> Self {
        if player.knocked_down {
            AnimationState::KnockedDown
        } else if player.ai.current().is_celebration() {
            AnimationState::Celebrating
        } else if player.charge.charging {
            AnimationState::Charging
        } else if player.body.speed() > pc::MOVING_SPEED {
            AnimationState::Running
        } else {
            AnimationState::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub side: TeamSide,
    pub role: TacticalRole,
    pub position: Vec2,
    pub velocity: Vec2,
    pub stamina: f32,
    pub animation: AnimationState,
    pub controlled: bool,
    pub ai_state: &'static str,
}

impl PlayerView {
    /// `human_driven` marks the player currently moved by input
    pub fn of(player: &Player, human_driven: bool) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            side: player.side,
            role: player.role,
            position: player.body.position,
            velocity: player.body.velocity,
            stamina: player.stamina,
            animation: AnimationState::of(player),
            controlled: player.controlled,
            ai_state: if human_driven { "human" } else { player.ai.current().name() },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub position: Vec2,
    pub height: f32,
    pub velocity: Vec2,
    pub last_toucher: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RestartView {
    pub kind: RestartKind,
    pub side: TeamSide,
    pub taker: Option<PlayerId>,
    pub timer: f32,
    pub direction: Vec2,
    pub charge: f32,
    pub phase: RestartPhase,
}

impl From<&Restart> for RestartView {
    fn from(restart: &Restart) -> Self {
        Self {
            kind: restart.kind,
            side: restart.side,
            taker: restart.taker,
            timer: restart.timer.max(0.0),
            direction: restart.direction,
            charge: restart.charge,
            phase: restart.phase,
        }
    }
}

/// Everything a presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub state: MatchState,
    pub clock: ClockReading,
    pub score: Score,
    /// 3, 2, 1 during the countdown; None for "GO" and outside it
    pub countdown: Option<u32>,
    pub players: Vec<PlayerView>,
    pub ball: BallView,
    pub restart: Option<RestartView>,
    pub camera: Option<CameraOverride>,
}

impl MatchSnapshot {
    pub fn controlled_player(&self) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.controlled)
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
