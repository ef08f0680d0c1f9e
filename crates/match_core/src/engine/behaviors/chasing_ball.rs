//! Chasing Ball State Logic
//!
//! The authorized chaser runs at the ball's short-term predicted position.
//! Keepers chase only while the ball is in their penalty area.

use super::goalkeeper_positioning::{contain_goalkeeper, in_penalty_area};
use super::positioning::pursue;
use super::traits::{AiFrame, AiState, AiStateKind, Transition};
use crate::engine::physics_constants::ai;

#[derive(Debug, Default)]
pub struct ChasingBallState;

impl AiState for ChasingBallState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::ChasingBall
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        if ctx.has_possession {
            return Transition::to(AiStateKind::Dribbling);
        }

        if ctx.is_goalkeeper() {
            if !in_penalty_area(ctx.side, ctx.ball_position) {
                return Transition::to(AiStateKind::Positioning);
            }
        } else {
            if !ctx.authorized_chaser || ctx.distance_to_ball > ai::CHASE_GIVE_UP {
                return Transition::to(AiStateKind::Positioning);
            }
            let opponent_clearly_closer = ctx.opponent_distance_to_ball.map_or(false, |d| {
                d + ai::CHASE_YIELD_MARGIN < ctx.distance_to_ball
                    && ctx.distance_to_ball > ai::CHASE_YIELD_MIN_DISTANCE
            });
            if opponent_clearly_closer {
                return Transition::to(AiStateKind::Positioning);
            }
        }

        let lead = ctx.ball_position + ctx.ball_velocity * ai::CHASE_LEAD_SECS;
        pursue(frame.body, lead, ctx.max_speed);
        if ctx.is_goalkeeper() {
            contain_goalkeeper(ctx.side, frame.body);
        }
        Transition::to(AiStateKind::ChasingBall)
    }
}
