//! Shared positioning machinery
//!
//! Role states compute a raw target as a distance-weighted blend of the home
//! position and the ball, then feed it through [`TargetCache`] so small
//! positional noise never moves the cached target.

use super::traits::{AiFrame, AiStateKind, Transition};
use crate::engine::ai_context::AiContext;
use crate::engine::geometry::{distance, lerp, Vec2};
use crate::engine::physics_constants::ai;
use crate::models::{Body, Flank};

/// Cached positioning target with a minimum update delta
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetCache {
    cached: Option<Vec2>,
}

impl TargetCache {
    pub fn refresh(&mut self, raw: Vec2) -> Vec2 {
        match self.cached {
            Some(current) if distance(current, raw) < ai::MIN_TARGET_UPDATE => current,
            _ => {
                self.cached = Some(raw);
                raw
            }
        }
    }

    pub fn get(&self) -> Option<Vec2> {
        self.cached
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}

/// Steer toward `target`, slowing inside the arrive radius.
/// Returns the remaining distance; inside the dead zone the player stops.
pub fn arrive(body: &mut Body, target: Vec2, max_speed: f32) -> f32 {
    let offset = target - body.position;
    let remaining = offset.norm();
    if remaining <= ai::DEAD_ZONE {
        body.velocity = Vec2::zeros();
        return remaining;
    }
    let speed = max_speed * (remaining / ai::ARRIVE_RADIUS).clamp(0.3, 1.0);
    body.velocity = offset / remaining * speed;
    remaining
}

/// Full-speed pursuit
pub fn pursue(body: &mut Body, target: Vec2, max_speed: f32) {
    let offset = target - body.position;
    let len = offset.norm();
    body.velocity = if len > f32::EPSILON { offset / len * max_speed } else { Vec2::zeros() };
}

/// Tunables for an outfield role's positioning
#[derive(Debug, Clone, Copy)]
pub struct RoleShape {
    /// Ball weight when the ball is far / close
    pub min_weight: f32,
    pub max_weight: f32,
    /// Allowed depth band (0 = own goal line, 1 = opponent goal line)
    pub depth: (f32, f32),
    /// Depth shift while the ball is in the attacking / defending half
    pub attacking_push: f32,
    pub defending_drop: f32,
    /// Authorized chasers switch to ChasingBall inside this range
    pub chase_range: f32,
}

impl RoleShape {
    pub fn ball_weight(&self, distance_to_ball: f32) -> f32 {
        let t = (distance_to_ball / ai::BLEND_RANGE).clamp(0.0, 1.0);
        self.max_weight + (self.min_weight - self.max_weight) * t
    }
}

/// Lateral band (team-relative, 0 = own left touchline)
pub fn flank_band(flank: Flank) -> (f32, f32) {
    match flank {
        Flank::Left => (0.03, 0.45),
        Flank::Center => (0.2, 0.8),
        Flank::Right => (0.55, 0.97),
    }
}

/// Blend home and ball, then clamp to the role's depth and flank bands.
/// Returns team-relative (depth, lateral) so role states can adjust further.
pub fn blended_relative(ctx: &AiContext, shape: &RoleShape) -> (f32, f32) {
    let weight = shape.ball_weight(ctx.distance_to_ball);
    let raw = lerp(ctx.home_position, ctx.ball_position, weight);
    let (mut depth, mut lateral) = ctx.side.to_relative(raw);
    depth += if ctx.ball_in_attacking_half { shape.attacking_push } else { -shape.defending_drop };
    let (lo, hi) = flank_band(ctx.role.flank());
    depth = depth.clamp(shape.depth.0, shape.depth.1);
    lateral = lateral.clamp(lo, hi);
    (depth, lateral)
}

/// Common transition and steering for outfield positioning states
pub fn outfield_step(
    frame: &mut AiFrame<'_>,
    cache: &mut TargetCache,
    shape: &RoleShape,
    raw_target: Vec2,
) -> Transition {
    let ctx = frame.ctx;
    if ctx.has_possession {
        return Transition::to(AiStateKind::Dribbling);
    }
    if ctx.authorized_chaser && ctx.distance_to_ball < shape.chase_range {
        return Transition::to(AiStateKind::ChasingBall);
    }

    let target = cache.refresh(raw_target);
    let remaining = arrive(frame.body, target, ctx.max_speed);
    if remaining <= ai::DEAD_ZONE {
        Transition::to(AiStateKind::Idle)
    } else {
        Transition::to(AiStateKind::Positioning)
    }
}
