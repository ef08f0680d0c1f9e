//! Passing State Logic
//!
//! Lines up behind the ball toward the best pass target and releases an
//! [`Intent::Pass`]; power scales with distance and passing skill.

use super::kick_setup::{KickSetup, SetupStep};
use super::traits::{AiFrame, AiState, AiStateKind, Intent, Transition};
use crate::engine::ai_context::AiContext;
use crate::engine::geometry::{direction_to, distance, rotate, Vec2};
use crate::engine::physics_constants::ai;
use rand::Rng;

/// Max aim error (radians) for a zero-skill passer
const MAX_PASS_ERROR: f32 = 0.15;

pub fn pass_power(distance: f32, passing: f32) -> f32 {
    let base = (distance * ai::PASS_POWER_PER_UNIT + 120.0).clamp(ai::PASS_MIN_POWER, ai::PASS_MAX_POWER);
    base * (0.8 + 0.4 * passing / 100.0)
}

fn build_pass(ctx: &AiContext, target_id: usize, target: Vec2, rng: &mut impl Rng) -> Intent {
    let dist = distance(ctx.ball_position, target);
    let error = rng.gen_range(-1.0f32..=1.0) * (1.0 - ctx.skills.passing / 100.0) * MAX_PASS_ERROR;
    Intent::Pass {
        target: target_id,
        direction: rotate(direction_to(ctx.ball_position, target), error),
        power: pass_power(dist, ctx.skills.passing),
        lift: if dist > ai::PASS_LOFT_DISTANCE { ai::PASS_LOFT_LIFT } else { 0.0 },
    }
}

#[derive(Debug, Default)]
pub struct PassingState {
    setup: KickSetup,
}

impl AiState for PassingState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Passing
    }

    fn enter(&mut self) {
        self.setup.reset();
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        let Some(target) = ctx.best_pass_target else {
            return Transition::to(AiStateKind::Positioning);
        };
        let aim = direction_to(ctx.ball_position, target.position);
        match self.setup.step(frame, aim) {
            SetupStep::Ready => {
                let intent = build_pass(ctx, target.id, target.position, frame.rng);
                log::debug!("player {} passes to {}", ctx.player_id, target.id);
                Transition::kick(AiStateKind::Positioning, intent)
            }
            SetupStep::Moving => Transition::to(AiStateKind::Passing),
            SetupStep::Abandon => Transition::to(AiStateKind::Positioning),
        }
    }
}
