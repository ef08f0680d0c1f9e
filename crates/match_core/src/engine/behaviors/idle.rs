//! Idle State Logic
//!
//! Default fallback near the home position. Idle players stand still until
//! they are drifted away from home, the ball moves on, or they are cleared
//! to chase.

use super::traits::{AiFrame, AiState, AiStateKind, Transition};
use crate::engine::geometry::{distance, Vec2};
use crate::engine::physics_constants::ai;

/// Ball travel since entering Idle that forces a re-position
const BALL_MOVED_THRESHOLD: f32 = 150.0;

#[derive(Debug, Default)]
pub struct IdleState {
    ball_anchor: Option<Vec2>,
}

impl AiState for IdleState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Idle
    }

    fn enter(&mut self) {
        self.ball_anchor = None;
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        frame.body.velocity = Vec2::zeros();
        let anchor = *self.ball_anchor.get_or_insert(ctx.ball_position);

        if ctx.authorized_chaser && !ctx.is_goalkeeper() {
            if ctx.in_kickoff_window() || ctx.distance_to_ball < ai::IDLE_CHASE_RANGE {
                return Transition::to(AiStateKind::ChasingBall);
            }
        }

        if distance(ctx.position, ctx.home_position) > ai::IDLE_HOME_LEASH
            || distance(anchor, ctx.ball_position) > BALL_MOVED_THRESHOLD
        {
            return Transition::to(AiStateKind::Positioning);
        }

        Transition::to(AiStateKind::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::vec2;
    use crate::models::{TacticalRole, TeamSide};
    use crate::test_fixtures::{context_for, run_state};

    #[test]
    fn test_kickoff_window_sends_chaser() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::ST, vec2(1500.0, 1150.0));
        ctx.distance_to_ball = 900.0;
        ctx.authorized_chaser = true;
        ctx.timers.kickoff_elapsed = 0.5;
        let (transition, _) = run_state(&mut IdleState::default(), &ctx);
        assert_eq!(transition.next, AiStateKind::ChasingBall);

        ctx.timers.kickoff_elapsed = 10.0;
        let (transition, _) = run_state(&mut IdleState::default(), &ctx);
        assert_ne!(transition.next, AiStateKind::ChasingBall);
    }

    #[test]
    fn test_far_from_home_repositions() {
        let mut ctx = context_for(TeamSide::Away, TacticalRole::CM, vec2(2000.0, 1000.0));
        ctx.home_position = vec2(2300.0, 1000.0);
        ctx.timers.kickoff_elapsed = 10.0;
        let (transition, body) = run_state(&mut IdleState::default(), &ctx);
        assert_eq!(transition.next, AiStateKind::Positioning);
        assert_eq!(body.velocity, Vec2::zeros());
    }

    #[test]
    fn test_stays_idle_at_home() {
        let mut ctx = context_for(TeamSide::Away, TacticalRole::CM, vec2(2000.0, 1000.0));
        ctx.timers.kickoff_elapsed = 10.0;
        let mut state = IdleState::default();
        assert_eq!(run_state(&mut state, &ctx).0.next, AiStateKind::Idle);

        // Ball moves on while idling
        ctx.ball_position += vec2(300.0, 0.0);
        assert_eq!(run_state(&mut state, &ctx).0.next, AiStateKind::Positioning);
    }
}
