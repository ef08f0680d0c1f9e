//! Reposition-then-kick helper shared by Passing and Shooting
//!
//! A kick is released only when the ball lies inside the kicker's legal cone
//! for the chosen aim; otherwise the player first runs to a spot behind the
//! ball on the aim line.

use super::positioning::{arrive, pursue};
use super::traits::AiFrame;
use crate::engine::geometry::{distance, direction_to, Vec2};
use crate::engine::physics_constants::{ai, player as pc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// In range and aligned: kick now
    Ready,
    Moving,
    /// Timed out or the ball got away
    Abandon,
}

#[derive(Debug, Default)]
pub struct KickSetup {
    elapsed: f32,
}

impl KickSetup {
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn step(&mut self, frame: &mut AiFrame<'_>, aim: Vec2) -> SetupStep {
        let ctx = frame.ctx;
        self.elapsed += frame.dt;
        if self.elapsed > ai::KICK_SETUP_TIMEOUT || ctx.distance_to_ball > ai::KICK_ABANDON_DISTANCE {
            return SetupStep::Abandon;
        }

        let to_ball = direction_to(ctx.position, ctx.ball_position);
        let aligned = to_ball.dot(&aim) > ai::KICK_CONE_DOT;
        if aligned && ctx.distance_to_ball <= pc::KICK_RADIUS {
            // Hold on the ball until a strike is allowed
            frame.body.velocity = Vec2::zeros();
            return if ctx.kick_ready { SetupStep::Ready } else { SetupStep::Moving };
        }

        let spot = ctx.ball_position - aim * ai::KICK_SETUP_DISTANCE;
        if aligned || distance(ctx.position, spot) <= ai::KICK_SETUP_TOLERANCE {
            pursue(frame.body, ctx.ball_position, ctx.max_speed * 0.6);
        } else {
            arrive(frame.body, spot, ctx.max_speed);
        }
        SetupStep::Moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::behaviors::traits::AiFrame;
    use crate::engine::geometry::vec2;
    use crate::models::{Body, TacticalRole, TeamSide};
    use crate::test_fixtures::context_for;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn step_once(setup: &mut KickSetup, ctx: &crate::engine::ai_context::AiContext, aim: Vec2) -> (SetupStep, Body) {
        let mut body = Body::at(ctx.position, vec2(1.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut frame = AiFrame { ctx, body: &mut body, rng: &mut rng, dt: 1.0 / 60.0 };
        let step = setup.step(&mut frame, aim);
        (step, body)
    }

    #[test]
    fn test_ready_when_aligned_in_range() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::CM, vec2(1000.0, 1000.0));
        ctx.ball_position = vec2(1030.0, 1000.0);
        ctx.distance_to_ball = 30.0;
        let (step, _) = step_once(&mut KickSetup::default(), &ctx, vec2(1.0, 0.0));
        assert_eq!(step, SetupStep::Ready);
    }

    #[test]
    fn test_holds_on_ball_until_kick_allowed() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::CM, vec2(1000.0, 1000.0));
        ctx.ball_position = vec2(1030.0, 1000.0);
        ctx.distance_to_ball = 30.0;
        ctx.kick_ready = false;
        let mut setup = KickSetup::default();
        let (step, body) = step_once(&mut setup, &ctx, vec2(1.0, 0.0));
        assert_eq!(step, SetupStep::Moving);
        assert_eq!(body.velocity, Vec2::zeros());

        ctx.kick_ready = true;
        assert_eq!(step_once(&mut setup, &ctx, vec2(1.0, 0.0)).0, SetupStep::Ready);
    }

    #[test]
    fn test_repositions_when_on_wrong_side() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::CM, vec2(1060.0, 1000.0));
        ctx.ball_position = vec2(1030.0, 1000.0);
        ctx.distance_to_ball = 30.0;
        let (step, body) = step_once(&mut KickSetup::default(), &ctx, vec2(1.0, 0.0));
        assert_eq!(step, SetupStep::Moving);
        // Heading back behind the ball
        assert!(body.velocity.x < 0.0);
    }

    #[test]
    fn test_abandons_after_timeout() {
        let mut ctx = context_for(TeamSide::Home, TacticalRole::CM, vec2(1060.0, 1000.0));
        ctx.ball_position = vec2(1030.0, 1000.0);
        ctx.distance_to_ball = 30.0;
        let mut setup = KickSetup::default();
        let mut last = SetupStep::Moving;
        for _ in 0..120 {
            last = step_once(&mut setup, &ctx, vec2(1.0, 0.0)).0;
            if last == SetupStep::Abandon {
                break;
            }
        }
        assert_eq!(last, SetupStep::Abandon);
    }
}
