//! Midfielder Positioning State Logic
//!
//! Links the lines: follows the ball further than defenders and shifts
//! toward the ball's side of the pitch.

use super::positioning::{blended_relative, flank_band, outfield_step, RoleShape, TargetCache};
use super::traits::{AiFrame, AiState, AiStateKind, Transition};

pub const MIDFIELDER_SHAPE: RoleShape = RoleShape {
    min_weight: 0.25,
    max_weight: 0.6,
    depth: (0.12, 0.8),
    attacking_push: 0.08,
    defending_drop: 0.05,
    chase_range: 450.0,
};

/// How strongly the unit slides toward the ball's flank
const BALL_SIDE_SHIFT: f32 = 0.2;

#[derive(Debug, Default)]
pub struct MidfielderPositioning {
    cache: TargetCache,
}

impl AiState for MidfielderPositioning {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Positioning
    }

    fn enter(&mut self) {
        self.cache.clear();
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        let (depth, lateral) = blended_relative(ctx, &MIDFIELDER_SHAPE);
        let (_, ball_lateral) = ctx.side.to_relative(ctx.ball_position);
        let (lo, hi) = flank_band(ctx.role.flank());
        let lateral = (lateral + (ball_lateral - 0.5) * BALL_SIDE_SHIFT).clamp(lo, hi);
        let target = ctx.side.to_world(depth, lateral);
        outfield_step(frame, &mut self.cache, &MIDFIELDER_SHAPE, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::vec2;
    use crate::models::{TacticalRole, TeamSide};
    use crate::test_fixtures::{context_for, run_state};

    #[test]
    fn test_reaching_target_goes_idle() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::CM, vec2(1000.0, 1150.0));
        ctx.ball_position = vec2(1000.0, 1150.0);
        ctx.distance_to_ball = 0.0;
        let mut state = MidfielderPositioning::default();
        let (first, _) = run_state(&mut state, &ctx);
        assert_eq!(first.next, AiStateKind::Positioning);

        // Standing on the cached target
        ctx.position = state.cache.get().unwrap();
        let (second, body) = run_state(&mut state, &ctx);
        assert_eq!(second.next, AiStateKind::Idle);
        assert_eq!(body.velocity.norm(), 0.0);
    }

    #[test]
    fn test_possession_starts_dribbling() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::CM, vec2(1000.0, 1150.0));
        ctx.has_possession = true;
        let (transition, _) = run_state(&mut MidfielderPositioning::default(), &ctx);
        assert_eq!(transition.next, AiStateKind::Dribbling);
    }
}
