//! Forward Positioning State Logic
//!
//! Stays high, and runs level with or beyond the ball once the team is in
//! the attacking half.

use super::positioning::{blended_relative, outfield_step, RoleShape, TargetCache};
use super::traits::{AiFrame, AiState, AiStateKind, Transition};

pub const FORWARD_SHAPE: RoleShape = RoleShape {
    min_weight: 0.25,
    max_weight: 0.55,
    depth: (0.3, 0.93),
    attacking_push: 0.1,
    defending_drop: 0.0,
    chase_range: 500.0,
};

/// Depth a forward tries to keep ahead of the ball when attacking
const RUN_AHEAD: f32 = 0.05;

#[derive(Debug, Default)]
pub struct ForwardPositioning {
    cache: TargetCache,
}

impl AiState for ForwardPositioning {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Positioning
    }

    fn enter(&mut self) {
        self.cache.clear();
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        let (mut depth, lateral) = blended_relative(ctx, &FORWARD_SHAPE);
        if ctx.ball_in_attacking_half {
            let (ball_depth, _) = ctx.side.to_relative(ctx.ball_position);
            depth = depth.max(ball_depth + RUN_AHEAD).min(FORWARD_SHAPE.depth.1);
        }
        let target = ctx.side.to_world(depth, lateral);
        outfield_step(frame, &mut self.cache, &FORWARD_SHAPE, target)
    }
}
