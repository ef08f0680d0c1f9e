//! Avoiding Sideline State Logic
//!
//! A dribbler pinned against a touchline carries the ball back infield
//! before resuming normal dribbling decisions.

use super::dribbling::sideline_distance;
use super::traits::{AiFrame, AiState, AiStateKind, Transition};
use crate::engine::geometry::{normalize_or_zero, vec2};
use crate::engine::physics_constants::{ai, field};

/// Forward component mixed into the infield escape direction
const FORWARD_BIAS: f32 = 0.6;

#[derive(Debug, Default)]
pub struct AvoidingSidelineState {
    elapsed: f32,
}

impl AiState for AvoidingSidelineState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::AvoidingSideline
    }

    fn enter(&mut self) {
        self.elapsed = 0.0;
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        self.elapsed += frame.dt;
        if ctx.distance_to_ball > ai::LOST_POSSESSION {
            return Transition::to(AiStateKind::ChasingBall);
        }
        if sideline_distance(ctx.position.y) > ai::SIDELINE_CLEAR || self.elapsed >= ai::SIDELINE_TIMEOUT {
            return Transition::to(AiStateKind::Dribbling);
        }

        let inward = (field::CENTER_Y - ctx.position.y).signum();
        let dir = normalize_or_zero(vec2(ctx.attack_sign() * FORWARD_BIAS, inward));
        frame.body.velocity = dir * ctx.max_speed * 0.8;
        Transition::to(AiStateKind::AvoidingSideline)
    }
}
