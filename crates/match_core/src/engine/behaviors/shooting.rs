//! Shooting State Logic
//!
//! Picks a spot inside the goal mouth, lines up, and releases an
//! [`Intent::Shoot`]. Keepers use the same state to clear the ball upfield.

use super::kick_setup::{KickSetup, SetupStep};
use super::traits::{AiFrame, AiState, AiStateKind, Intent, Transition};
use crate::engine::geometry::{direction_to, rotate, vec2, Vec2};
use crate::engine::physics_constants::{ai, field};
use rand::Rng;

/// Share of the goal width a shot may target either side of center
const AIM_SPREAD: f32 = 0.35;
/// Max aim error (radians) for a zero-skill shooter
const MAX_SHOT_ERROR: f32 = 0.2;

pub fn shot_power(shooting: f32) -> f32 {
    ai::SHOT_POWER * (0.7 + 0.3 * shooting / 100.0)
}

#[derive(Debug, Default)]
pub struct ShootingState {
    setup: KickSetup,
    aim_point: Option<Vec2>,
}

impl AiState for ShootingState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Shooting
    }

    fn enter(&mut self) {
        self.setup.reset();
        self.aim_point = None;
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        let aim_point = *self.aim_point.get_or_insert_with(|| {
            let offset = frame.rng.gen_range(-AIM_SPREAD..=AIM_SPREAD) * field::GOAL_WIDTH;
            vec2(ctx.opponent_goal.x, field::CENTER_Y + offset)
        });
        let aim = direction_to(ctx.ball_position, aim_point);

        match self.setup.step(frame, aim) {
            SetupStep::Ready => {
                let error =
                    frame.rng.gen_range(-1.0f32..=1.0) * (1.0 - ctx.skills.shooting / 100.0) * MAX_SHOT_ERROR;
                let intent = Intent::Shoot {
                    aim: aim_point,
                    direction: rotate(aim, error),
                    power: shot_power(ctx.skills.shooting),
                    lift: frame.rng.gen_range(0.0..ai::SHOT_MAX_LIFT),
                };
                log::debug!("player {} shoots at {:?}", ctx.player_id, aim_point);
                Transition::kick(AiStateKind::Positioning, intent)
            }
            SetupStep::Moving => Transition::to(AiStateKind::Shooting),
            SetupStep::Abandon => Transition::to(AiStateKind::Positioning),
        }
    }
}
