//! Defender Positioning State Logic
//!
//! Holds the back line, staying goal-side of the ball while it is in the
//! defending half. Full-backs keep to their defensive third of the width.

use super::positioning::{blended_relative, outfield_step, RoleShape, TargetCache};
use super::traits::{AiFrame, AiState, AiStateKind, Transition};

pub const DEFENDER_SHAPE: RoleShape = RoleShape {
    min_weight: 0.15,
    max_weight: 0.5,
    depth: (0.05, 0.55),
    attacking_push: 0.06,
    defending_drop: 0.04,
    chase_range: 350.0,
};

/// Depth kept between the ball and the defensive line
const GOAL_SIDE_MARGIN: f32 = 0.03;

#[derive(Debug, Default)]
pub struct DefenderPositioning {
    cache: TargetCache,
}

impl AiState for DefenderPositioning {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Positioning
    }

    fn enter(&mut self) {
        self.cache.clear();
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        let (mut depth, lateral) = blended_relative(ctx, &DEFENDER_SHAPE);
        if ctx.ball_in_defending_half {
            let (ball_depth, _) = ctx.side.to_relative(ctx.ball_position);
            depth = depth.min((ball_depth - GOAL_SIDE_MARGIN).max(DEFENDER_SHAPE.depth.0));
        }
        let target = ctx.side.to_world(depth, lateral);
        outfield_step(frame, &mut self.cache, &DEFENDER_SHAPE, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::vec2;
    use crate::engine::physics_constants::field;
    use crate::models::{TacticalRole, TeamSide};
    use crate::test_fixtures::{context_for, run_state};

    #[test]
    fn test_left_back_stays_on_left_third() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::LB, vec2(700.0, 450.0));
        ctx.ball_position = vec2(900.0, field::BOTTOM_SIDELINE - 50.0);
        ctx.distance_to_ball = 1200.0;
        let mut state = DefenderPositioning::default();
        let (transition, body) = run_state(&mut state, &ctx);
        assert_eq!(transition.next, AiStateKind::Positioning);
        let target = state.cache.get().unwrap();
        let (_, lateral) = TeamSide::Home.to_relative(target);
        assert!(lateral <= 0.45 + 1e-4);
        assert!(body.velocity.norm() > 0.0);
    }

    #[test]
    fn test_goal_side_of_ball_when_defending() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::CB, vec2(700.0, 1150.0));
        ctx.ball_position = vec2(600.0, 1150.0);
        ctx.distance_to_ball = 100.0;
        ctx.ball_in_defending_half = true;
        ctx.ball_in_attacking_half = false;
        let mut state = DefenderPositioning::default();
        run_state(&mut state, &ctx);
        let target = state.cache.get().unwrap();
        assert!(target.x < 600.0);
    }

    #[test]
    fn test_authorized_close_defender_chases() {
        let mut ctx = context_for(TeamSide::Away, TacticalRole::CB, vec2(2500.0, 1150.0));
        ctx.ball_position = vec2(2300.0, 1150.0);
        ctx.distance_to_ball = 200.0;
        ctx.authorized_chaser = true;
        let (transition, _) = run_state(&mut DefenderPositioning::default(), &ctx);
        assert_eq!(transition.next, AiStateKind::ChasingBall);
    }
}
