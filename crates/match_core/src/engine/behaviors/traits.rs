//! Trait definitions for AI behavior states
//!
//! Every state follows the same Enter/Update/Exit contract. `update` writes
//! the desired velocity into the player's [`Body`] and returns a
//! [`Transition`]; kicks are requested through an explicit [`Intent`] that
//! the match engine interprets.

use crate::engine::ai_context::AiContext;
use crate::engine::geometry::Vec2;
use crate::models::{Body, PlayerId};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// The fixed catalog of behavior states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AiStateKind {
    Idle,
    /// Dispatched to the player's role-specialized positioning state
    Positioning,
    ChasingBall,
    Dribbling,
    Passing,
    Shooting,
    AvoidingSideline,
    CelebrationRun,
    CelebrationChase,
}

impl AiStateKind {
    pub fn name(self) -> &'static str {
        match self {
            AiStateKind::Idle => "idle",
            AiStateKind::Positioning => "positioning",
            AiStateKind::ChasingBall => "chasing_ball",
            AiStateKind::Dribbling => "dribbling",
            AiStateKind::Passing => "passing",
            AiStateKind::Shooting => "shooting",
            AiStateKind::AvoidingSideline => "avoiding_sideline",
            AiStateKind::CelebrationRun => "celebration_run",
            AiStateKind::CelebrationChase => "celebration_chase",
        }
    }

    pub fn is_celebration(self) -> bool {
        matches!(self, AiStateKind::CelebrationRun | AiStateKind::CelebrationChase)
    }

    /// States that kick through an [`Intent`] instead of auto-kicking
    pub fn kicks_by_intent(self) -> bool {
        matches!(self, AiStateKind::Passing | AiStateKind::Shooting)
    }
}

/// A kick the AI wants executed this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Intent {
    Pass { target: PlayerId, direction: Vec2, power: f32, lift: f32 },
    Shoot { aim: Vec2, direction: Vec2, power: f32, lift: f32 },
}

impl Intent {
    pub fn direction(&self) -> Vec2 {
        match self {
            Intent::Pass { direction, .. } | Intent::Shoot { direction, .. } => *direction,
        }
    }

    pub fn power(&self) -> f32 {
        match self {
            Intent::Pass { power, .. } | Intent::Shoot { power, .. } => *power,
        }
    }

    pub fn lift(&self) -> f32 {
        match self {
            Intent::Pass { lift, .. } | Intent::Shoot { lift, .. } => *lift,
        }
    }
}

/// Result of one state update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next: AiStateKind,
    pub intent: Option<Intent>,
}

impl Transition {
    pub fn to(next: AiStateKind) -> Self {
        Self { next, intent: None }
    }

    pub fn kick(next: AiStateKind, intent: Intent) -> Self {
        Self { next, intent: Some(intent) }
    }
}

/// Everything a state may read or write during one update
pub struct AiFrame<'a> {
    pub ctx: &'a AiContext,
    pub body: &'a mut Body,
    pub rng: &'a mut ChaCha8Rng,
    pub dt: f32,
}

pub trait AiState: Send {
    fn kind(&self) -> AiStateKind;

    /// Reset per-activation bookkeeping
    fn enter(&mut self) {}

    /// Write the desired velocity and choose the next state
    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition;

    fn exit(&mut self) {}
}
