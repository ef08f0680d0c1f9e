//! Goalkeeper Positioning State Logic
//!
//! Shadows the ball along an arc in front of goal and comes out to claim
//! loose balls inside the penalty area. The keeper's literal position is
//! hard-clamped to the penalty area every tick.

use super::positioning::{arrive, TargetCache};
use super::traits::{AiFrame, AiState, AiStateKind, Transition};
use crate::engine::ai_context::AiContext;
use crate::engine::geometry::{distance, vec2, Vec2};
use crate::engine::physics_constants::{ai, field};
use crate::models::{Body, TeamSide};

/// Distance off the goal line when the ball is far away
const BASE_DEPTH: f32 = 40.0;
/// Extra distance off the line as the ball approaches
const RUSH_DEPTH: f32 = 80.0;
/// Share of the ball's lateral offset the keeper mirrors
const LATERAL_TRACKING: f32 = 0.35;
const POST_MARGIN: f32 = 20.0;
/// Keeper comes for loose balls in the box inside this range
pub const CLAIM_RANGE: f32 = 300.0;

/// Penalty area bounds for the goal `side` defends (min corner, max corner)
pub fn penalty_area(side: TeamSide) -> (Vec2, Vec2) {
    let line = side.own_goal_line();
    let front = line + side.attack_sign() * field::PENALTY_AREA_DEPTH;
    let top = field::CENTER_Y - field::PENALTY_AREA_HEIGHT / 2.0;
    let bottom = field::CENTER_Y + field::PENALTY_AREA_HEIGHT / 2.0;
    (vec2(line.min(front), top), vec2(line.max(front), bottom))
}

pub fn in_penalty_area(side: TeamSide, point: Vec2) -> bool {
    let (min, max) = penalty_area(side);
    (min.x..=max.x).contains(&point.x) && (min.y..=max.y).contains(&point.y)
}

/// Containment invariant: a keeper never leaves its penalty area
pub fn contain_goalkeeper(side: TeamSide, body: &mut Body) {
    let (min, max) = penalty_area(side);
    body.position.x = body.position.x.clamp(min.x, max.x);
    body.position.y = body.position.y.clamp(min.y, max.y);
}

fn keeper_target(ctx: &AiContext) -> Vec2 {
    let ball_to_goal = distance(ctx.ball_position, ctx.own_goal);
    let urgency = 1.0 - (ball_to_goal / ai::BLEND_RANGE).clamp(0.0, 1.0);
    let depth = BASE_DEPTH + RUSH_DEPTH * urgency;
    let x = ctx.own_goal.x + ctx.attack_sign() * depth;
    let y = (field::CENTER_Y + (ctx.ball_position.y - field::CENTER_Y) * LATERAL_TRACKING)
        .clamp(field::GOAL_TOP - POST_MARGIN, field::GOAL_BOTTOM + POST_MARGIN);
    vec2(x, y)
}

#[derive(Debug, Default)]
pub struct GoalkeeperPositioning {
    cache: TargetCache,
}

impl AiState for GoalkeeperPositioning {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Positioning
    }

    fn enter(&mut self) {
        self.cache.clear();
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        contain_goalkeeper(ctx.side, frame.body);

        if ctx.has_possession {
            return Transition::to(AiStateKind::Dribbling);
        }
        if in_penalty_area(ctx.side, ctx.ball_position) && ctx.distance_to_ball < CLAIM_RANGE {
            return Transition::to(AiStateKind::ChasingBall);
        }

        let target = self.cache.refresh(keeper_target(ctx));
        let remaining = arrive(frame.body, target, ctx.max_speed);
        if remaining <= ai::DEAD_ZONE {
            Transition::to(AiStateKind::Idle)
        } else {
            Transition::to(AiStateKind::Positioning)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TacticalRole;
    use crate::test_fixtures::{context_for, run_state};

    #[test]
    fn test_clamps_keeper_into_box() {
        let ctx = context_for(TeamSide::Home, TacticalRole::GK, vec2(1200.0, 300.0));
        let (_, body) = run_state(&mut GoalkeeperPositioning::default(), &ctx);
        assert!(in_penalty_area(TeamSide::Home, body.position));
    }

    #[test]
    fn test_target_stays_near_goal_mouth() {
        let mut ctx = context_for(TeamSide::Away, TacticalRole::GK, vec2(2990.0, 1150.0));
        ctx.ball_position = vec2(2000.0, 300.0);
        ctx.distance_to_ball = distance(ctx.position, ctx.ball_position);
        let mut state = GoalkeeperPositioning::default();
        run_state(&mut state, &ctx);
        let target = state.cache.get().unwrap();
        assert!(target.x < field::RIGHT_GOAL_LINE);
        assert!(target.y >= field::GOAL_TOP - POST_MARGIN - 1e-3);
        assert!(target.y < field::CENTER_Y);
    }

    #[test]
    fn test_claims_loose_ball_in_box() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::GK, vec2(300.0, 1150.0));
        ctx.ball_position = vec2(500.0, 1200.0);
        ctx.distance_to_ball = distance(ctx.position, ctx.ball_position);
        let (transition, _) = run_state(&mut GoalkeeperPositioning::default(), &ctx);
        assert_eq!(transition.next, AiStateKind::ChasingBall);
    }

    #[test]
    fn test_penalty_area_orientation() {
        let (min, max) = penalty_area(TeamSide::Away);
        assert!((max.x - field::RIGHT_GOAL_LINE).abs() < 1e-3);
        assert!((max.x - min.x - field::PENALTY_AREA_DEPTH).abs() < 1e-3);
    }
}
