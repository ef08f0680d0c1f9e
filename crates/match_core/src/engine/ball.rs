//! Ball state and physics
//!
//! This module contains:
//! - Ball struct (position, independent height axis, velocities, last toucher)
//! - Fixed-step integration with gravity, bounce, friction and air drag
//! - Goal frame contacts (back of net, crossbar, posts)
//! - Goal detection and out-of-play classification
//!
//! The ball is owned by the match engine; everything else goes through the
//! kick/place/nudge API below.

use super::geometry::{vec2, Vec2};
use super::physics_constants::{ball as bc, field, goal_frame};
use crate::models::{PlayerId, TeamSide};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    position: Vec2,
    height: f32,
    velocity: Vec2,
    vertical_velocity: f32,
    last_toucher: Option<PlayerId>,
}

impl Ball {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            height: 0.0,
            velocity: Vec2::zeros(),
            vertical_velocity: 0.0,
            last_toucher: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn last_toucher(&self) -> Option<PlayerId> {
        self.last_toucher
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    pub fn is_grounded(&self) -> bool {
        self.height <= bc::GROUNDED_HEIGHT
    }

    /// Teleport and stop the ball (kickoff and restart placement)
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.height = 0.0;
        self.velocity = Vec2::zeros();
        self.vertical_velocity = 0.0;
    }

    /// Deliberate strike. Last write wins on the toucher.
    pub fn kick(&mut self, velocity: Vec2, lift: f32, toucher: Option<PlayerId>) {
        self.velocity = velocity;
        self.vertical_velocity = lift.max(0.0);
        if toucher.is_some() {
            self.last_toucher = toucher;
        }
    }

    /// Incidental contact: adds to horizontal velocity without launching
    pub fn nudge(&mut self, push: Vec2, toucher: PlayerId) {
        self.velocity += push;
        self.last_toucher = Some(toucher);
    }

    pub fn clear_toucher(&mut self) {
        self.last_toucher = None;
    }

    /// One fixed step of free-ball physics
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;

        self.vertical_velocity -= bc::GRAVITY * dt;
        self.height += self.vertical_velocity * dt;

        if self.height <= 0.0 {
            self.height = 0.0;
            if self.vertical_velocity < 0.0 {
                if self.vertical_velocity.abs() > bc::BOUNCE_MIN_SPEED {
                    self.vertical_velocity = -self.vertical_velocity * bc::GROUND_BOUNCE;
                } else {
                    self.vertical_velocity = 0.0;
                }
            }
        }

        if self.height <= 0.0 {
            self.velocity *= bc::GROUND_FRICTION;
        } else {
            self.velocity *= bc::AIR_DRAG;
        }

        if self.velocity.norm() < bc::STOP_SPEED {
            self.velocity = Vec2::zeros();
        }
        if self.height <= 0.0 && self.vertical_velocity.abs() < bc::STOP_SPEED {
            self.vertical_velocity = 0.0;
        }
    }
}

/// The two goals, named by the side of the pitch they stand on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoalEnd {
    Left,
    Right,
}

impl GoalEnd {
    pub fn line_x(self) -> f32 {
        match self {
            GoalEnd::Left => field::LEFT_GOAL_LINE,
            GoalEnd::Right => field::RIGHT_GOAL_LINE,
        }
    }

    /// Team defending this goal
    pub fn defender(self) -> TeamSide {
        match self {
            GoalEnd::Left => TeamSide::Home,
            GoalEnd::Right => TeamSide::Away,
        }
    }

    /// Unit X pointing out of the field through this goal line
    fn outward(self) -> f32 {
        match self {
            GoalEnd::Left => -1.0,
            GoalEnd::Right => 1.0,
        }
    }

    /// Signed distance past the goal line (positive = outside the field)
    fn depth_past_line(self, x: f32) -> f32 {
        (x - self.line_x()) * self.outward()
    }

    fn nearest(x: f32) -> Self {
        if x < field::CENTER_X {
            GoalEnd::Left
        } else {
            GoalEnd::Right
        }
    }
}

/// Which part of the goal frame the ball hit this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameContact {
    BackOfNet(GoalEnd),
    Crossbar(GoalEnd),
    Post(GoalEnd),
}

/// How the ball left the field of play
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum OutOfPlay {
    /// Over the goal line, wide of the posts or over the bar
    GoalLine { end: GoalEnd, y: f32, over_bar: bool },
    /// Over a touchline; `top` is the low-Y sideline
    Sideline { top: bool, x: f32 },
}

fn within_goal_mouth(y: f32) -> bool {
    (field::GOAL_TOP..=field::GOAL_BOTTOM).contains(&y)
}

/// Resolve at most one goal frame contact, applying its bounce.
pub fn resolve_goal_frame(ball: &mut Ball) -> Option<FrameContact> {
    let end = GoalEnd::nearest(ball.position.x);
    let depth = end.depth_past_line(ball.position.x);
    let outward_speed = ball.velocity.x * end.outward();
    let y = ball.position.y;

    // Back of the net
    if depth > field::GOAL_DEPTH && within_goal_mouth(y) && ball.height <= field::CROSSBAR_HEIGHT {
        ball.position.x = end.line_x() + end.outward() * field::GOAL_DEPTH;
        if outward_speed > 0.0 {
            ball.velocity.x = -ball.velocity.x * goal_frame::NET_BOUNCE_X;
        }
        ball.velocity.y *= goal_frame::NET_BOUNCE_Y;
        return Some(FrameContact::BackOfNet(end));
    }

    let near_line = depth.abs() < goal_frame::FRAME_X_TOLERANCE;

    // Crossbar
    if near_line
        && within_goal_mouth(y)
        && (ball.height - field::CROSSBAR_HEIGHT).abs() < goal_frame::CROSSBAR_TOLERANCE
        && ball.vertical_velocity < 0.0
    {
        ball.vertical_velocity = -ball.vertical_velocity * goal_frame::CROSSBAR_BOUNCE_Z;
        ball.velocity.x = -ball.velocity.x * goal_frame::CROSSBAR_BOUNCE_X;
        return Some(FrameContact::Crossbar(end));
    }

    // Posts
    let near_post = (y - field::GOAL_TOP).abs() < goal_frame::POST_TOLERANCE
        || (y - field::GOAL_BOTTOM).abs() < goal_frame::POST_TOLERANCE;
    if near_line && near_post && ball.height < field::CROSSBAR_HEIGHT && outward_speed > 0.0 {
        ball.velocity = -ball.velocity * goal_frame::POST_BOUNCE_XY;
        ball.vertical_velocity *= goal_frame::POST_DAMP_Z;
        return Some(FrameContact::Post(end));
    }

    None
}

/// Goal when the whole ball is past the line, inside the posts, under the bar
pub fn detect_goal(ball: &Ball) -> Option<GoalEnd> {
    let end = GoalEnd::nearest(ball.position.x);
    let fully_past = end.depth_past_line(ball.position.x) > bc::RADIUS;
    if fully_past && within_goal_mouth(ball.position.y) && ball.height <= field::CROSSBAR_HEIGHT {
        Some(end)
    } else {
        None
    }
}

/// Out-of-play classification; only meaningful when no goal was detected.
pub fn classify_out_of_bounds(ball: &Ball) -> Option<OutOfPlay> {
    let pos = ball.position;
    let end = GoalEnd::nearest(pos.x);

    if end.depth_past_line(pos.x) > bc::RADIUS {
        let over_bar = ball.height > field::CROSSBAR_HEIGHT;
        if over_bar || !within_goal_mouth(pos.y) {
            return Some(OutOfPlay::GoalLine { end, y: pos.y, over_bar });
        }
        // Inside the goal mouth under the bar belongs to goal detection
        return None;
    }

    if pos.y < field::TOP_SIDELINE - field::SIDELINE_OUT_TOLERANCE {
        return Some(OutOfPlay::Sideline { top: true, x: pos.x });
    }
    if pos.y > field::BOTTOM_SIDELINE + field::SIDELINE_OUT_TOLERANCE {
        return Some(OutOfPlay::Sideline { top: false, x: pos.x });
    }
    None
}

/// Center spot
pub fn center_spot() -> Vec2 {
    vec2(field::CENTER_X, field::CENTER_Y)
}
