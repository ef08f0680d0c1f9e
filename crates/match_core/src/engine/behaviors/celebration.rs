//! Goal celebration states
//!
//! The scorer runs to a corner flag at the end they attacked; teammates
//! trail the scorer. Neither state leaves on its own: the match engine
//! forces the next state once the celebration finishes.

use super::positioning::arrive;
use super::traits::{AiFrame, AiState, AiStateKind, Transition};
use crate::engine::geometry::{vec2, Vec2};
use crate::engine::physics_constants::field;

/// Followers stop this far from the scorer
pub const FOLLOW_DISTANCE: f32 = 60.0;

/// Corner flag nearest to `position` at the end `side` attacks
pub fn celebration_corner(position: Vec2, goal_line: f32) -> Vec2 {
    let y = if position.y < field::CENTER_Y { field::TOP_SIDELINE } else { field::BOTTOM_SIDELINE };
    vec2(goal_line, y)
}

#[derive(Debug, Default)]
pub struct CelebrationRunState {
    corner: Option<Vec2>,
}

impl AiState for CelebrationRunState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::CelebrationRun
    }

    fn enter(&mut self) {
        self.corner = None;
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        let corner = *self
            .corner
            .get_or_insert_with(|| celebration_corner(ctx.position, ctx.opponent_goal.x));
        arrive(frame.body, corner, ctx.max_speed);
        Transition::to(AiStateKind::CelebrationRun)
    }
}

#[derive(Debug, Default)]
pub struct CelebrationChaseState;

impl AiState for CelebrationChaseState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::CelebrationChase
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        match ctx.celebration_focus {
            Some(focus) => {
                let offset = ctx.position - focus;
                let len = offset.norm();
                let stand_off = if len > f32::EPSILON { focus + offset / len * FOLLOW_DISTANCE } else { focus };
                arrive(frame.body, stand_off, ctx.max_speed);
            }
            None => frame.body.velocity = Vec2::zeros(),
        }
        Transition::to(AiStateKind::CelebrationChase)
    }
}
