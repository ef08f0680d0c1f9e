//! Human input boundary

use super::geometry::{sanitize_stick, Vec2};
use serde::{Deserialize, Serialize};

/// One tick of input for the human-controlled player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Normalized movement stick; longer vectors are re-normalized
    pub movement: Vec2,
    pub action_held: bool,
    /// Discrete "switch controlled player" command
    pub switch_player: bool,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self { movement: Vec2::zeros(), action_held: false, switch_player: false }
    }
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(movement: Vec2) -> Self {
        Self { movement, ..Self::default() }
    }

    /// NaN becomes zero, length is capped at 1
    pub fn sanitized(self) -> Self {
        Self { movement: sanitize_stick(self.movement), ..self }
    }

    /// Any input at all; used to skip a celebration
    pub fn is_active(&self) -> bool {
        self.movement.norm() > f32::EPSILON || self.action_held || self.switch_player
    }
}

/// Who drives the controlled player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    #[default]
    Human,
    /// The controlled flag is kept but the AI drives the player
    Autopilot,
}
