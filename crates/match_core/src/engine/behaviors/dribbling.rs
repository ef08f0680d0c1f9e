//! Dribbling State Logic
//!
//! Carries the ball toward the opponent goal with auto-kick touches and,
//! every decision interval, rolls the role's pass/shoot tables.

use super::traits::{AiFrame, AiState, AiStateKind, Transition};
use crate::engine::ai_context::AiContext;
use crate::engine::geometry::{direction_to, normalize_or_zero, vec2, Vec2};
use crate::engine::physics_constants::{ai, field};
use crate::models::PositionRole;
use rand::Rng;

/// Distance to keep behind the ball while carrying it
const CARRY_OFFSET: f32 = 15.0;
/// Swing wide around the ball when it is between the player and their own goal
const LOOP_OFFSET: f32 = 40.0;
/// Sidestep strength when an opponent is in the way
const EVADE_RADIUS: f32 = 120.0;
const EVADE_WEIGHT: f32 = 0.35;
/// Carrying speed relative to top speed
const CARRY_SPEED: f32 = 0.85;

/// Shot probability for a forward by distance to goal
pub fn forward_shot_chance(distance_to_goal: f32) -> f64 {
    if distance_to_goal < 200.0 {
        1.0
    } else if distance_to_goal < 400.0 {
        0.95
    } else if distance_to_goal < 700.0 {
        0.6
    } else if distance_to_goal < 1000.0 {
        0.4
    } else {
        0.2
    }
}

/// Shot probability for a midfielder by distance to goal
pub fn midfielder_shot_chance(distance_to_goal: f32) -> f64 {
    if distance_to_goal < 250.0 {
        0.8
    } else if distance_to_goal < 500.0 {
        0.4
    } else {
        0.0
    }
}

/// Shot probability for a defender by distance to goal
pub fn defender_shot_chance(distance_to_goal: f32) -> f64 {
    if distance_to_goal < 300.0 {
        0.3
    } else {
        0.0
    }
}

/// Pass probabilities per decision tick
#[derive(Debug, Clone, Copy)]
struct PassTable {
    /// An open teammate is closer to goal
    ahead: f64,
    /// Under pressure with any open teammate
    pressured: f64,
}

/// Role-keyed pass/shoot decision. `None` keeps dribbling.
pub fn decide(ctx: &AiContext, rng: &mut impl Rng) -> Option<AiStateKind> {
    let dist = ctx.distance_to_opponent_goal;
    let pressured = ctx.is_pressured();

    let (shot_chance, table) = match ctx.position_role {
        PositionRole::Goalkeeper => {
            return Some(if ctx.best_pass_target.is_some() {
                AiStateKind::Passing
            } else {
                AiStateKind::Shooting
            });
        }
        PositionRole::Defender => {
            (defender_shot_chance(dist), PassTable { ahead: 0.98, pressured: 0.7 })
        }
        PositionRole::Midfielder => (
            midfielder_shot_chance(dist),
            PassTable { ahead: if pressured { 0.85 } else { 0.6 }, pressured: 0.75 },
        ),
        PositionRole::Forward => {
            (forward_shot_chance(dist), PassTable { ahead: 0.35, pressured: 0.5 })
        }
    };

    if shot_chance > 0.0 && rng.gen_bool(shot_chance) {
        return Some(AiStateKind::Shooting);
    }

    let open_target = ctx.best_pass_target.filter(|t| !t.blocked);
    if open_target.map_or(false, |t| ctx.pass_progress(&t) > 0.0) {
        return rng.gen_bool(table.ahead).then_some(AiStateKind::Passing);
    }
    if pressured && open_target.is_some() {
        return rng.gen_bool(table.pressured).then_some(AiStateKind::Passing);
    }
    None
}

/// Distance from `y` to the nearer touchline
pub fn sideline_distance(y: f32) -> f32 {
    (y - field::TOP_SIDELINE).min(field::BOTTOM_SIDELINE - y)
}

/// Velocity that keeps the player behind the ball heading for goal
pub fn carry_velocity(ctx: &AiContext) -> Vec2 {
    let goal_dir = direction_to(ctx.ball_position, ctx.opponent_goal);
    let to_ball = ctx.ball_position - ctx.position;
    let behind = ctx.ball_position - goal_dir * CARRY_OFFSET;

    let mut dir = if to_ball.dot(&goal_dir) < 0.0 {
        // Ball is behind us: loop around it
        let side = vec2(-goal_dir.y, goal_dir.x);
        let side = if side.dot(&to_ball) >= 0.0 { side } else { -side };
        direction_to(ctx.position, ctx.ball_position - goal_dir * LOOP_OFFSET + side * LOOP_OFFSET)
    } else {
        normalize_or_zero(direction_to(ctx.position, behind) * 0.5 + goal_dir * 0.5)
    };

    if let Some(opponent) = ctx.nearest_opponent.filter(|o| o.distance < EVADE_RADIUS) {
        let away = direction_to(opponent.position, ctx.position);
        dir = normalize_or_zero(dir + away * EVADE_WEIGHT);
    }
    dir * ctx.max_speed * CARRY_SPEED
}

#[derive(Debug, Default)]
pub struct DribblingState {
    decision_timer: f32,
}

impl AiState for DribblingState {
    fn kind(&self) -> AiStateKind {
        AiStateKind::Dribbling
    }

    fn enter(&mut self) {
        self.decision_timer = 0.0;
    }

    fn update(&mut self, frame: &mut AiFrame<'_>) -> Transition {
        let ctx = frame.ctx;
        if ctx.distance_to_ball > ai::LOST_POSSESSION {
            return Transition::to(AiStateKind::ChasingBall);
        }
        if !ctx.is_goalkeeper() && sideline_distance(ctx.position.y) < ai::SIDELINE_TRIGGER {
            return Transition::to(AiStateKind::AvoidingSideline);
        }

        self.decision_timer += frame.dt;
        if self.decision_timer >= ai::DECISION_INTERVAL {
            self.decision_timer = 0.0;
            if let Some(next) = decide(ctx, frame.rng) {
                return Transition::to(next);
            }
        }

        frame.body.velocity = carry_velocity(ctx);
        Transition::to(AiStateKind::Dribbling)
    }
}
