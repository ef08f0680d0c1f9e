//! Top-level match states

use super::restart::RestartKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchState {
    CameraInit,
    Countdown,
    Playing,
    ThrowIn,
    CornerKick,
    GoalKick,
    GoalCelebration,
    FinalScore,
    Ended,
}

impl MatchState {
    pub fn for_restart(kind: RestartKind) -> Self {
        match kind {
            RestartKind::ThrowIn => MatchState::ThrowIn,
            RestartKind::CornerKick => MatchState::CornerKick,
            RestartKind::GoalKick => MatchState::GoalKick,
        }
    }

    pub fn is_restart(self) -> bool {
        matches!(self, MatchState::ThrowIn | MatchState::CornerKick | MatchState::GoalKick)
    }

    /// Players move in these states
    pub fn players_active(self) -> bool {
        matches!(self, MatchState::Playing | MatchState::GoalCelebration) || self.is_restart()
    }
}
